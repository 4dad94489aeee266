use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::distribution::ContinuousModel;
use crate::error::InvalidConfigError;
use crate::least_squares::LineFit;
use crate::sample::SampleError;

use super::transform::{best_on_grid, lambda_grid};

/// Filliben's approximation of the medians of the uniform order
/// statistics of a sample of size `n`.
pub fn order_statistic_medians(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let nf = n as f64;
    let last = 0.5_f64.powf(nf.recip());

    (1..=n)
        .map(|i| {
            if i == n {
                last
            } else if i == 1 {
                1.0 - last
            } else {
                (i as f64 - 0.3175) / (nf + 0.365)
            }
        })
        .collect()
}

/// Probability plot of a sample against a reference distribution.
///
/// The ordered data are paired with the reference quantiles of the
/// order-statistic medians; the straight-line fit through the points and
/// its correlation coefficient (PPCC) summarise how well the
/// distribution describes the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityPlot {
    /// Reference quantiles (horizontal axis).
    pub theoretical: Vec<f64>,
    /// Sorted observations (vertical axis).
    pub ordered: Vec<f64>,
    /// Least-squares line through the points.
    pub line: LineFit,
}

impl ProbabilityPlot {
    /// Probability plot against a fitted model.
    pub fn new<M>(data: &[f64], model: &M) -> Self
    where
        M: ContinuousModel + ?Sized,
    {
        Self::with_quantile(data, |p| model.inverse_cdf(p))
    }

    /// Normal probability plot.
    pub fn normal(data: &[f64]) -> Self {
        let normal = Normal::standard();
        Self::with_quantile(data, |p| normal.inverse_cdf(p))
    }

    /// Probability plot against the Tukey-lambda distribution of shape
    /// `lambda`.
    pub fn tukey_lambda(data: &[f64], lambda: f64) -> Self {
        Self::with_quantile(data, |p| tukey_lambda_quantile(p, lambda))
    }

    fn with_quantile<F>(data: &[f64], quantile: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let mut ordered = data.to_vec();
        ordered.sort_by(f64::total_cmp);
        let theoretical: Vec<f64> = order_statistic_medians(ordered.len()).into_iter().map(quantile).collect();
        let line = LineFit::fit(&theoretical, &ordered);
        Self { theoretical, ordered, line }
    }

    /// Probability plot correlation coefficient.
    pub fn ppcc(&self) -> f64 {
        self.line.r
    }
}

/// Quantile function of the Tukey-lambda distribution,
/// `(p^λ - (1-p)^λ)/λ`, and the logistic `ln(p/(1-p))` at `λ = 0`.
///
/// Notable members: `λ = 0` logistic, `λ ≈ 0.14` close to normal,
/// `λ = 1` uniform; negative values give tails heavier than logistic.
pub fn tukey_lambda_quantile(p: f64, lambda: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if lambda.abs() < f64::EPSILON {
        (p / (1.0 - p)).ln()
    } else {
        (p.powf(lambda) - (1.0 - p).powf(lambda)) / lambda
    }
}

/// PPCC plot over the Tukey-lambda family: the probability plot
/// correlation for each shape on a grid, and the best-fitting shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TukeyLambdaPpcc {
    /// Grid of shape values.
    pub lambdas: Vec<f64>,
    /// Correlation at each shape.
    pub ppcc: Vec<f64>,
    /// Shape with the largest correlation.
    pub best_lambda: f64,
    /// Largest correlation.
    pub best_ppcc: f64,
}

impl TukeyLambdaPpcc {
    /// Evaluate `points` shapes from `min` to `max` inclusive.
    ///
    /// # Errors
    /// [`InvalidConfigError::InvalidLambdaGrid`] for fewer than two
    /// points or `min ≥ max`.
    pub fn search(data: &[f64], min: f64, max: f64, points: usize) -> Result<Self, InvalidConfigError> {
        let lambdas = lambda_grid(min, max, points)?;
        let ppcc: Vec<f64> = lambdas
            .iter()
            .map(|&lambda| ProbabilityPlot::tukey_lambda(data, lambda).ppcc())
            .collect();

        let (best_lambda, best_ppcc) = best_on_grid(&lambdas, &ppcc, |r| r);
        Ok(Self { lambdas, ppcc, best_lambda, best_ppcc })
    }
}

/// Weibull plot: `ln(-ln(1 - pᵢ))` against `ln xᵢ` with the mean ranks
/// `pᵢ = (i - 0.3)/(n + 0.4)`. For Weibull data the points fall on a line
/// of slope `β` that crosses zero at `ln λ`, which gives graphical
/// estimates of shape and scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeibullPlot {
    /// Logs of the sorted observations (horizontal axis).
    pub log_ordered: Vec<f64>,
    /// `ln(-ln(1 - pᵢ))` (vertical axis).
    pub weibull_probability: Vec<f64>,
    /// Least-squares line through the points.
    pub line: LineFit,
    /// Shape estimate, the slope of the line.
    pub shape: f64,
    /// Scale estimate, `exp(-intercept/slope)`.
    pub scale: f64,
}

impl WeibullPlot {
    /// # Errors
    /// [`SampleError::NonPositive`] for an observation `≤ 0`.
    pub fn new(data: &[f64]) -> Result<Self, SampleError> {
        if let Some((index, &value)) = data.iter().enumerate().find(|(_, x)| !(**x > 0.0)) {
            return Err(SampleError::NonPositive { index, value });
        }

        let mut ordered = data.to_vec();
        ordered.sort_by(f64::total_cmp);
        let log_ordered: Vec<f64> = ordered.iter().map(|x| x.ln()).collect();

        let n = ordered.len() as f64;
        let weibull_probability: Vec<f64> = (1..=ordered.len())
            .map(|i| {
                let p = (i as f64 - 0.3) / (n + 0.4);
                (-(-p).ln_1p()).ln()
            })
            .collect();

        let line = LineFit::fit(&log_ordered, &weibull_probability);
        Ok(Self {
            log_ordered,
            weibull_probability,
            shape: line.slope,
            scale: (-line.intercept / line.slope).exp(),
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Family;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use itertools::Itertools;

    #[test]
    fn medians_are_symmetric_and_increasing() {
        let m = order_statistic_medians(9);
        assert_eq!(m.len(), 9);
        assert!(m.iter().tuple_windows().all(|(a, b)| a < b));
        for (lo, hi) in m.iter().zip(m.iter().rev()) {
            assert_abs_diff_eq!(lo + hi, 1.0, epsilon = 1e-3);
        }
        assert_abs_diff_eq!(m.get(4).copied().unwrap_or(f64::NAN), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(m.last().copied().unwrap_or(f64::NAN), 0.5_f64.powf(1.0 / 9.0), epsilon = 1e-12);
    }

    #[test]
    fn exact_normal_quantiles_have_unit_ppcc() {
        let normal = Normal::standard();
        let data: Vec<f64> = order_statistic_medians(25)
            .into_iter()
            .map(|p| 10.0 + 2.0 * normal.inverse_cdf(p))
            .collect();
        let plot = ProbabilityPlot::normal(&data);
        assert_abs_diff_eq!(plot.ppcc(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(plot.line.slope, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(plot.line.intercept, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn fitted_model_plot_is_nearly_straight() {
        let data = [370.0, 706.0, 716.0, 746.0, 785.0, 797.0, 844.0, 855.0, 858.0, 886.0, 886.0, 930.0];
        let fit = Family::Gamma.fit(&data).expect("fits");
        let plot = ProbabilityPlot::new(&data, &fit.model);
        assert!(plot.ppcc() > 0.8, "ppcc {}", plot.ppcc());
        assert_eq!(plot.ordered.first().copied(), Some(370.0));
    }

    #[test]
    fn tukey_lambda_members() {
        assert_abs_diff_eq!(tukey_lambda_quantile(0.5, 0.3), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(tukey_lambda_quantile(0.75, 0.0), 3.0_f64.ln(), epsilon = 1e-12);
        // λ = 1 is uniform on [-1, 1]
        assert_abs_diff_eq!(tukey_lambda_quantile(0.8, 1.0), 0.6, epsilon = 1e-12);
        assert!(tukey_lambda_quantile(1.2, 0.5).is_nan());
    }

    #[test]
    fn ppcc_search_picks_logistic_shape() {
        let data: Vec<f64> = order_statistic_medians(30)
            .into_iter()
            .map(|p| 4.0 + 1.5 * tukey_lambda_quantile(p, 0.0))
            .collect();

        let search = TukeyLambdaPpcc::search(&data, -1.0, 1.0, 21).expect("valid grid");
        assert_eq!(search.ppcc.len(), 21);
        assert_abs_diff_eq!(search.best_lambda, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(search.best_ppcc, 1.0, epsilon = 1e-12);
        assert!(TukeyLambdaPpcc::search(&data, 1.0, 1.0, 21).is_err());
    }

    #[test]
    fn weibull_plot_recovers_shape_and_scale() {
        let (shape, scale) = (2.0, 50.0);
        let n = 20;
        let data: Vec<f64> = (1..=n)
            .rev()
            .map(|i| {
                let p = (f64::from(i) - 0.3) / (f64::from(n) + 0.4);
                scale * (-(-p).ln_1p()).powf(1.0 / shape)
            })
            .collect();

        let plot = WeibullPlot::new(&data).expect("positive data");
        assert!(plot.log_ordered.iter().tuple_windows().all(|(a, b)| a < b));
        assert_relative_eq!(plot.shape, shape, max_relative = 1e-9);
        assert_relative_eq!(plot.scale, scale, max_relative = 1e-9);
        assert_abs_diff_eq!(plot.line.r, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn weibull_plot_needs_positive_data() {
        assert!(matches!(
            WeibullPlot::new(&[3.0, -1.0, 2.0]),
            Err(SampleError::NonPositive { index: 1, .. })
        ));
    }
}
