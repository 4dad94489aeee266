use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF};

use super::{ContinuousModel, Family, check_param};
use crate::error::{FitError, ParameterError};
use crate::statistics::{Mean, Statistic, Variance};

/// Log-normal distribution: ln X ~ N(μ, σ²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogNormal {
    mu: f64,
    sigma: f64,
    #[serde(skip)]
    inner: statrs::distribution::LogNormal,
}

impl LogNormal {
    /// # Errors
    /// Non-finite `mu` or non-positive `sigma`.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, ParameterError> {
        let mu = check_param("mu", mu, false)?;
        let sigma = check_param("sigma", sigma, true)?;
        let inner = statrs::distribution::LogNormal::new(mu, sigma)
            .map_err(|_| ParameterError { name: "sigma", value: sigma })?;
        Ok(Self { mu, sigma, inner })
    }

    /// Mean of ln X.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Standard deviation of ln X.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

pub(super) fn fit(data: &[f64]) -> Result<LogNormal, FitError> {
    let logs: Vec<f64> = data.iter().map(|x| x.ln()).collect();
    let mu: f64 = Mean.compute(&logs);
    let sigma = Variance::population().compute(&logs).sqrt();

    LogNormal::new(mu, sigma).map_err(|_| FitError::Degenerate {
        family: Family::LogNormal,
        reason: "zero variance of log data",
    })
}

impl ContinuousModel for LogNormal {
    fn ln_pdf(&self, x: f64) -> f64 {
        self.inner.ln_pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.inner.cdf(x)
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.inner.inverse_cdf(p)
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![("mu", self.mu), ("sigma", self.sigma)]
    }
}
