//! Two- and three-parameter Weibull distributions.
//!
//! For a fixed location the shape solves the profile likelihood equation
//!
//! ```text
//! f(β) = n/β + Σ ln tᵢ - n·Σ tᵢ^β ln tᵢ / Σ tᵢ^β = 0
//! ```
//!
//! and the scale follows as `λ = (Σ tᵢ^β / n)^(1/β)`. The three-parameter
//! fit maximises that profile over the location `γ ∈ [0, min x)`. For a
//! shape below one that profile grows without bound as `γ → min x`, so
//! such fits are rejected as degenerate.

use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF};

use super::{ContinuousModel, Family, check_param, solver_error};
use crate::error::{FitError, ParameterError};
use crate::math::{ScalarOptions, golden_section};

const MAX_ITER: usize = 200;
const TOL: f64 = 1e-10;

/// Weibull distribution with shape `β` and scale `λ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weibull {
    shape: f64,
    scale: f64,
    #[serde(skip)]
    inner: statrs::distribution::Weibull,
}

impl Weibull {
    /// # Errors
    /// Non-positive or non-finite shape or scale.
    pub fn new(shape: f64, scale: f64) -> Result<Self, ParameterError> {
        let shape = check_param("shape", shape, true)?;
        let scale = check_param("scale", scale, true)?;
        let inner = statrs::distribution::Weibull::new(shape, scale)
            .map_err(|_| ParameterError { name: "scale", value: scale })?;
        Ok(Self { shape, scale, inner })
    }

    /// Shape `β`.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale `λ`.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Weibull distribution shifted by a location (threshold) `γ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weibull3 {
    shape: f64,
    scale: f64,
    location: f64,
    #[serde(skip)]
    base: Weibull,
}

impl Weibull3 {
    /// # Errors
    /// Non-positive shape or scale, or a non-finite location.
    pub fn new(shape: f64, scale: f64, location: f64) -> Result<Self, ParameterError> {
        let base = Weibull::new(shape, scale)?;
        let location = check_param("location", location, false)?;
        Ok(Self { shape, scale, location, base })
    }

    /// Shape `β`.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale `λ`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Location `γ`; the support is `(γ, ∞)`.
    pub fn location(&self) -> f64 {
        self.location
    }
}

pub(super) fn fit(data: &[f64]) -> Result<Weibull, FitError> {
    let (shape, scale) = fit_shape_scale(data, Family::Weibull)?;
    Weibull::new(shape, scale)
        .map_err(|_| FitError::Degenerate { family: Family::Weibull, reason: "parameter estimate out of range" })
}

pub(super) fn fit3(data: &[f64]) -> Result<Weibull3, FitError> {
    const FAMILY: Family = Family::Weibull3;

    let x_min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let cap = 1e-6 * x_min;
    let upper = x_min - cap;

    let shifted = |gamma: f64| -> Vec<f64> { data.iter().map(|x| x - gamma).collect() };
    let profile = |gamma: f64| -> Result<(f64, f64, f64), FitError> {
        let t = shifted(gamma);
        let (shape, scale) = fit_shape_scale(&t, FAMILY)?;
        let log_likelihood = Weibull::new(shape, scale)
            .map_err(|_| FitError::Degenerate { family: FAMILY, reason: "parameter estimate out of range" })?
            .log_likelihood(&t);
        Ok((shape, scale, log_likelihood))
    };
    let neg_profile = |gamma: f64| match profile(gamma) {
        Ok((_, _, ll)) if ll.is_finite() => -ll,
        _ => f64::INFINITY,
    };

    let options = ScalarOptions { tol: 1e-9 * x_min, rtol: 1e-10, max_iter: MAX_ITER };
    let interior = golden_section(neg_profile, 0.0, upper, &options)
        .map_err(|e| solver_error(FAMILY, e))?
        .x;

    // the maximum may sit on the boundary γ = 0, which golden section never evaluates
    let mut best = profile(0.0).map(|(shape, scale, ll)| (0.0, shape, scale, ll));
    if let Ok((shape, scale, ll)) = profile(interior) {
        let better = match &best {
            Ok((.., boundary_ll)) => ll > *boundary_ll,
            Err(_) => ll.is_finite(),
        };
        if better {
            best = Ok((interior, shape, scale, ll));
        }
    }

    let (location, shape, scale, _) = best?;
    if shape <= 1.0 || x_min - location <= 2.0 * cap {
        return Err(FitError::Degenerate { family: FAMILY, reason: "likelihood unbounded as location approaches min x" });
    }
    Weibull3::new(shape, scale, location)
        .map_err(|_| FitError::Degenerate { family: FAMILY, reason: "parameter estimate out of range" })
}

/// Shape and scale MLE for positive `t`.
///
/// Works on `t / max t` so that `t^β` cannot overflow for large shapes.
/// Newton steps are safeguarded by the bracket `[lo, hi]` that the sign of
/// the decreasing score maintains; a step leaving it is replaced by
/// bisection (or doubling while no upper bound is known).
fn fit_shape_scale(t: &[f64], family: Family) -> Result<(f64, f64), FitError> {
    let n = t.len() as f64;
    let t_max = t.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(t_max > 0.0) {
        return Err(FitError::Degenerate { family, reason: "non-positive data" });
    }

    let ln_u: Vec<f64> = t.iter().map(|x| (x / t_max).ln()).collect();
    let sum_ln_u: f64 = ln_u.iter().sum();
    if !(sum_ln_u < 0.0) {
        return Err(FitError::Degenerate { family, reason: "zero spread" });
    }

    let sums = |beta: f64| {
        ln_u.iter().fold((0.0, 0.0, 0.0), |(s0, s1, s2), &lu| {
            let w = (beta * lu).exp();
            (s0 + w, s1 + w * lu, s2 + w * lu * lu)
        })
    };

    let mut beta = 1.2_f64;
    let mut lo = 0.0_f64;
    let mut hi = f64::INFINITY;

    for _ in 0..MAX_ITER {
        let (s0, s1, s2) = sums(beta);
        let ratio = s1 / s0;
        let score = n / beta + sum_ln_u - n * ratio;
        if score.abs() <= 0.0 {
            return Ok((beta, t_max * (s0 / n).powf(1.0 / beta)));
        }
        if score > 0.0 {
            lo = beta;
        } else {
            hi = beta;
        }

        let slope = -n / (beta * beta) - n * (s2 / s0 - ratio * ratio);
        let mut next = beta - score / slope;
        if !(next > lo && next < hi) {
            next = if hi.is_finite() { 0.5 * (lo + hi) } else { 2.0 * beta };
        }

        if (next - beta).abs() <= TOL * beta {
            let (s0, ..) = sums(next);
            return Ok((next, t_max * (s0 / n).powf(1.0 / next)));
        }
        beta = next;
    }

    Err(FitError::NoConvergence { family, iterations: MAX_ITER })
}

impl ContinuousModel for Weibull {
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

impl ContinuousModel for Weibull3 {
    fn ln_pdf(&self, x: f64) -> f64 {
        self.base.ln_pdf(x - self.location)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.base.cdf(x - self.location)
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        self.location + self.base.inverse_cdf(p)
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![("shape", self.shape), ("scale", self.scale), ("location", self.location)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const SPACED: [f64; 10] = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];

    fn quantiles(model: &impl ContinuousModel, n: usize) -> Vec<f64> {
        (1..=n).map(|i| model.inverse_cdf(i as f64 / (n as f64 + 1.0))).collect()
    }

    #[test]
    fn shape_solves_profile_equation() {
        let model = fit(&SPACED).expect("fits");
        let n = SPACED.len() as f64;
        let beta = model.shape();
        let s0: f64 = SPACED.iter().map(|t| t.powf(beta)).sum();
        let s1: f64 = SPACED.iter().map(|t| t.powf(beta) * t.ln()).sum();
        let sum_ln: f64 = SPACED.iter().map(|t| t.ln()).sum();

        assert_abs_diff_eq!(n / beta + sum_ln - n * s1 / s0, 0.0, epsilon = 1e-7);
        assert_relative_eq!(model.scale(), (s0 / n).powf(1.0 / beta), max_relative = 1e-10);
        assert!(model.shape() > 1.5 && model.shape() < 5.0);
    }

    #[test]
    fn estimate_is_a_local_maximum() {
        let model = fit(&SPACED).expect("fits");
        let best = model.log_likelihood(&SPACED);
        for (db, dl) in [(1.01, 1.0), (0.99, 1.0), (1.0, 1.01), (1.0, 0.99)] {
            let other = Weibull::new(model.shape() * db, model.scale() * dl).expect("valid");
            assert!(other.log_likelihood(&SPACED) < best);
        }
    }

    #[test]
    fn large_values_do_not_overflow() {
        let data: Vec<f64> = SPACED.iter().map(|x| x * 1e150).collect();
        let model = fit(&data).expect("fits");
        assert_relative_eq!(model.shape(), fit(&SPACED).expect("fits").shape(), max_relative = 1e-8);
    }

    #[test]
    fn exponential_case_closed_form() {
        let model = Weibull::new(1.0, 2.0).expect("valid");
        assert_abs_diff_eq!(model.cdf(2.0), 1.0 - (-1.0_f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(model.inverse_cdf(0.5), 2.0 * std::f64::consts::LN_2, epsilon = 1e-12);
    }

    #[test]
    fn three_parameter_fit_never_loses_to_two_parameter() {
        let truth = Weibull3::new(2.0, 50.0, 100.0).expect("valid");
        let data = quantiles(&truth, 40);

        let two = fit(&data).expect("fits");
        let three = fit3(&data).expect("fits");
        assert!(three.log_likelihood(&data) >= two.log_likelihood(&data) - 1e-6);
        let x_min = data.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(three.location() >= 0.0 && three.location() < x_min);
        assert!(three.location() > 50.0, "location {}", three.location());
        assert!(three.shape() > 1.0);
    }

    #[test]
    fn shape_below_one_has_no_three_parameter_maximum() {
        let truth = Weibull3::new(0.7, 100.0, 5.0).expect("valid");
        let data = quantiles(&truth, 30);

        let err = fit3(&data).expect_err("likelihood is unbounded near min x");
        assert!(matches!(err, FitError::Degenerate { family: Family::Weibull3, .. }), "{err}");
        assert!(fit(&data).is_ok());

        let ranking = crate::selection::ModelSelector::new([Family::Weibull, Family::Weibull3])
            .expect("valid")
            .rank(&crate::sample::Sample::new(data))
            .expect("two-parameter fit survives");
        assert_eq!(ranking.best().family(), Family::Weibull);
        assert_eq!(ranking.entries().len(), 1);
        assert!(matches!(ranking.failures(), [FitError::Degenerate { family: Family::Weibull3, .. }]));
    }

    #[test]
    fn location_shifts_support() {
        let model = Weibull3::new(1.5, 10.0, 5.0).expect("valid");
        assert!(model.ln_pdf(5.0).is_infinite());
        assert_abs_diff_eq!(model.cdf(4.0), 0.0);
        assert_abs_diff_eq!(model.inverse_cdf(model.cdf(12.0)), 12.0, epsilon = 1e-9);
    }
}
