use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF};
use statrs::function::gamma::digamma;

use super::{ContinuousModel, Family, check_param, solver_error};
use crate::error::{FitError, ParameterError};
use crate::math::{ScalarOptions, bisect};
use crate::statistics::{Mean, Statistic};

/// Gamma distribution with shape `k` and scale `θ` (location fixed at 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gamma {
    shape: f64,
    scale: f64,
    #[serde(skip)]
    inner: statrs::distribution::Gamma,
}

impl Gamma {
    /// # Errors
    /// Non-positive or non-finite shape or scale.
    pub fn new(shape: f64, scale: f64) -> Result<Self, ParameterError> {
        let shape = check_param("shape", shape, true)?;
        let scale = check_param("scale", scale, true)?;
        // statrs is parameterised by rate
        let inner = statrs::distribution::Gamma::new(shape, scale.recip())
            .map_err(|_| ParameterError { name: "scale", value: scale })?;
        Ok(Self { shape, scale, inner })
    }

    /// Shape `k`.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale `θ`.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// The shape solves `ln k - ψ(k) = ln x̄ - mean(ln x)`; the scale is then
/// `x̄ / k`. The left side decreases monotonically from +∞ to 0, so the
/// root is unique and bisection on an expanded bracket is safe.
pub(super) fn fit(data: &[f64]) -> Result<Gamma, FitError> {
    const FAMILY: Family = Family::Gamma;

    let mean: f64 = Mean.compute(&data);
    let logs: Vec<f64> = data.iter().map(|x| x.ln()).collect();
    let mean_log: f64 = Mean.compute(&logs);
    let s = mean.ln() - mean_log;
    if !(s > 0.0 && s.is_finite()) {
        return Err(FitError::Degenerate { family: FAMILY, reason: "log-mean gap is not positive" });
    }

    // Thom / Minka starting point, within a few percent of the root
    let guess = (3.0 - s + ((s - 3.0).powi(2) + 24.0 * s).sqrt()) / (12.0 * s);
    let score = |k: f64| k.ln() - digamma(k) - s;

    let mut lo = guess / 2.0;
    let mut hi = guess * 2.0;
    for _ in 0..64 {
        if score(lo) > 0.0 {
            break;
        }
        lo /= 2.0;
    }
    for _ in 0..64 {
        if score(hi) < 0.0 {
            break;
        }
        hi *= 2.0;
    }

    let shape = bisect(score, lo, hi, &ScalarOptions::default())
        .map_err(|e| solver_error(FAMILY, e))?
        .x;

    Gamma::new(shape, mean / shape)
        .map_err(|_| FitError::Degenerate { family: FAMILY, reason: "shape estimate out of range" })
}

impl ContinuousModel for Gamma {
    fn ln_pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
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
        vec![("shape", self.shape), ("scale", self.scale)]
    }
}
