use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use super::{ContinuousModel, Family, check_param};
use crate::error::{FitError, ParameterError};
use crate::statistics::{Mean, Statistic, Variance};

/// Normal distribution N(μ, σ²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gaussian {
    mean: f64,
    std_dev: f64,
    #[serde(skip)]
    normal: Normal,
}

impl Gaussian {
    /// # Errors
    /// Non-finite mean or non-positive standard deviation.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, ParameterError> {
        let mean = check_param("mean", mean, false)?;
        let std_dev = check_param("std_dev", std_dev, true)?;
        let normal = Normal::new(mean, std_dev).map_err(|_| ParameterError { name: "std_dev", value: std_dev })?;
        Ok(Self { mean, std_dev, normal })
    }

    /// Location μ.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Scale σ.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

/// μ̂ = x̄ and σ̂² = Σ(x - x̄)²/n.
pub(super) fn fit(data: &[f64]) -> Result<Gaussian, FitError> {
    let mean: f64 = Mean.compute(&data);
    let variance: f64 = Variance::population().compute(&data);
    let std_dev = variance.sqrt();

    Gaussian::new(mean, std_dev).map_err(|_| FitError::Degenerate {
        family: Family::Gaussian,
        reason: "zero variance",
    })
}

impl ContinuousModel for Gaussian {
    fn ln_pdf(&self, x: f64) -> f64 {
        self.normal.ln_pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.normal.cdf(x)
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.normal.inverse_cdf(p)
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![("mean", self.mean), ("std_dev", self.std_dev)]
    }
}
