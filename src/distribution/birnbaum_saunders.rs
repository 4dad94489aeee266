use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use super::{ContinuousModel, Family, check_param, solver_error};
use crate::error::{FitError, ParameterError};
use crate::math::{ScalarOptions, bisect};
use crate::statistics::{Mean, Statistic};

/// Birnbaum-Saunders (fatigue-life) distribution with shape `α` and
/// scale `β`. The scale is also the median.
///
/// `(√(x/β) - √(β/x)) / α` is standard normal, so every function is the
/// standard normal one composed with that transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BirnbaumSaunders {
    shape: f64,
    scale: f64,
}

impl BirnbaumSaunders {
    /// # Errors
    /// Non-positive or non-finite shape or scale.
    pub fn new(shape: f64, scale: f64) -> Result<Self, ParameterError> {
        Ok(Self {
            shape: check_param("shape", shape, true)?,
            scale: check_param("scale", scale, true)?,
        })
    }

    /// Shape `α`.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale `β`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn standardize(&self, x: f64) -> f64 {
        let ratio = (x / self.scale).sqrt();
        (ratio - ratio.recip()) / self.shape
    }
}

/// Birnbaum & Saunders (1969) likelihood equation for the scale,
///
/// ```text
/// β² - β(2r + K(β)) + r(s + K(β)) = 0,   K(β) = [mean 1/(β + xᵢ)]⁻¹
/// ```
///
/// with `s` the arithmetic and `r` the harmonic mean. The root lies in
/// `(r, s)`; the shape is `α = √(s/β + β/r - 2)`.
pub(super) fn fit(data: &[f64]) -> Result<BirnbaumSaunders, FitError> {
    const FAMILY: Family = Family::BirnbaumSaunders;

    let s: f64 = Mean.compute(&data);
    let reciprocals: Vec<f64> = data.iter().map(|x| x.recip()).collect();
    let mean_reciprocal: f64 = Mean.compute(&reciprocals);
    let r = mean_reciprocal.recip();
    if !(s > r) {
        return Err(FitError::Degenerate { family: FAMILY, reason: "zero spread" });
    }

    let k = |beta: f64| {
        let inv: Vec<f64> = data.iter().map(|x| (beta + x).recip()).collect();
        let mean: f64 = Mean.compute(&inv);
        mean.recip()
    };
    let equation = |beta: f64| {
        let kb = k(beta);
        beta * beta - beta * (2.0 * r + kb) + r * (s + kb)
    };

    let options = ScalarOptions { tol: 0.0, rtol: 1e-13, max_iter: 400 };
    let scale = bisect(equation, r, s, &options)
        .map_err(|e| solver_error(FAMILY, e))?
        .x;
    let shape = (s / scale + scale / r - 2.0).max(0.0).sqrt();

    BirnbaumSaunders::new(shape, scale)
        .map_err(|_| FitError::Degenerate { family: FAMILY, reason: "shape estimate is zero" })
}

impl ContinuousModel for BirnbaumSaunders {
    fn ln_pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
        // ln φ(z) + ln dz/dx
        let jacobian = (x / self.scale).sqrt() + (self.scale / x).sqrt();
        Normal::standard().ln_pdf(self.standardize(x)) + jacobian.ln() - (2.0 * self.shape * x).ln()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        Normal::standard().cdf(self.standardize(x))
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p <= 0.0 {
            return 0.0;
        }
        let w = 0.5 * self.shape * Normal::standard().inverse_cdf(p);
        // w + √(w² + 1) cancels in the lower tail
        let root = if w < 0.0 { (w.hypot(1.0) - w).recip() } else { w + w.hypot(1.0) };
        self.scale * root.powi(2)
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![("shape", self.shape), ("scale", self.scale)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const COUPONS: [f64; 8] = [370.0, 706.0, 716.0, 746.0, 785.0, 797.0, 844.0, 855.0];

    #[test]
    fn scale_lies_between_harmonic_and_arithmetic_mean() {
        let model = fit(&COUPONS).expect("fits");
        let n = COUPONS.len() as f64;
        let s = COUPONS.iter().sum::<f64>() / n;
        let r = n / COUPONS.iter().map(|x| x.recip()).sum::<f64>();
        assert!(model.scale() > r && model.scale() < s);
        assert_relative_eq!(
            model.shape(),
            (s / model.scale() + model.scale() / r - 2.0).sqrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn estimate_is_a_local_maximum() {
        let model = fit(&COUPONS).expect("fits");
        let best = model.log_likelihood(&COUPONS);
        for (da, db) in [(1.01, 1.0), (0.99, 1.0), (1.0, 1.01), (1.0, 0.99)] {
            let other = BirnbaumSaunders::new(model.shape() * da, model.scale() * db).expect("valid");
            assert!(other.log_likelihood(&COUPONS) < best);
        }
    }

    #[test]
    fn scale_is_the_median() {
        let model = BirnbaumSaunders::new(0.3, 1000.0).expect("valid");
        assert_abs_diff_eq!(model.cdf(1000.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(model.inverse_cdf(0.5), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn density_integrates_to_cdf() {
        let model = BirnbaumSaunders::new(0.5, 2.0).expect("valid");
        // composite Simpson on [0.01, 3]
        let (a, b, m) = (0.01, 3.0, 2000);
        let h = (b - a) / m as f64;
        let mut area = model.pdf(a) + model.pdf(b);
        for i in 1..m {
            let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
            area += weight * model.pdf(a + i as f64 * h);
        }
        area *= h / 3.0;
        assert_abs_diff_eq!(area, model.cdf(b) - model.cdf(a), epsilon = 1e-8);
    }
}
