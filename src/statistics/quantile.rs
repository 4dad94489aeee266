use super::{EmpiricalCDF, Statistic};

/// Linear-interpolated quantile of ascending `sorted` data (Hyndman-Fan
/// type 7, the default of most numerical stacks).
///
/// With `h = (n - 1) p`, returns `x[⌊h⌋] + (h - ⌊h⌋)(x[⌊h⌋ + 1] - x[⌊h⌋])`.
/// `p` is clamped to `[0, 1]`; empty input yields NaN.
pub fn interpolated_quantile(sorted: &[f64], p: f64) -> f64 {
    let Some(&last) = sorted.last() else {
        return f64::NAN;
    };
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    match (sorted.get(lo), sorted.get(lo + 1)) {
        (Some(&a), Some(&b)) => a + (h - h.floor()) * (b - a),
        (Some(&a), None) => a,
        _ => last,
    }
}

/// Quantile estimator at probability `p`.
#[derive(Debug, Clone, Copy)]
pub struct Quantile {
    p: f64,
}

impl Quantile {
    /// Creates a quantile estimator for probability `p ∈ [0, 1]`.
    #[inline]
    pub fn new(p: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p), "Quantile p must be in [0,1]");
        Self { p }
    }

    /// Convenience constructor for median (p = 0.5).
    #[inline]
    pub fn median() -> Self {
        Self { p: 0.5 }
    }
}

impl Statistic<EmpiricalCDF<f64>, f64> for Quantile {
    #[inline]
    fn compute(&self, ecdf: &EmpiricalCDF<f64>) -> f64 {
        interpolated_quantile(ecdf.points(), self.p)
    }
}

/// Pair of quantiles `(Q(lower), Q(upper))`.
#[derive(Debug, Clone, Copy)]
pub struct QuantileInterval {
    lower: f64,
    upper: f64,
}

impl QuantileInterval {
    /// Creates interval estimator for `[lower, upper]` probabilities.
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&lower));
        debug_assert!((0.0..=1.0).contains(&upper));
        debug_assert!(lower <= upper);
        Self { lower, upper }
    }

    /// Equal-tailed percentile interval: `[(1 - c)/2, 1 - (1 - c)/2]`.
    #[inline]
    pub fn percentile(confidence: f64) -> Self {
        let alpha = 1.0 - confidence;
        Self::new(alpha / 2.0, 1.0 - alpha / 2.0)
    }
}

impl Statistic<EmpiricalCDF<f64>, (f64, f64)> for QuantileInterval {
    #[inline]
    fn compute(&self, ecdf: &EmpiricalCDF<f64>) -> (f64, f64) {
        let points = ecdf.points();
        (
            interpolated_quantile(points, self.lower),
            interpolated_quantile(points, self.upper),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EmpiricalCDF, CDF};
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolates_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(interpolated_quantile(&sorted, 0.0), 1.0);
        assert_abs_diff_eq!(interpolated_quantile(&sorted, 0.5), 2.5);
        assert_abs_diff_eq!(interpolated_quantile(&sorted, 1.0), 4.0);
        // h = 3 * 0.1 = 0.3
        assert_abs_diff_eq!(interpolated_quantile(&sorted, 0.1), 1.3, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(interpolated_quantile(&[], 0.5).is_nan());
        assert_abs_diff_eq!(interpolated_quantile(&[7.0], 0.9), 7.0);
    }

    #[test]
    fn percentile_interval_on_ecdf() {
        let data: Vec<f64> = (1..=101).map(f64::from).rev().collect();
        let ecdf: EmpiricalCDF<f64> = CDF.compute(&data);
        let (lo, hi) = QuantileInterval::percentile(0.9).compute(&ecdf);
        assert_abs_diff_eq!(lo, 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hi, 96.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Quantile::median().compute(&ecdf), 51.0, epsilon = 1e-12);
    }
}
