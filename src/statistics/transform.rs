use serde::Serialize;

use crate::error::{Error, InvalidConfigError};
use crate::least_squares::LineFit;
use crate::sample::{Sample, SampleError};

use super::ProbabilityPlot;

/// Box-Cox power transform `(x^λ - 1)/λ`, `ln x` at `λ = 0`.
///
/// NaN for non-positive `x`.
pub fn box_cox(x: f64, lambda: f64) -> f64 {
    if !(x > 0.0) {
        return f64::NAN;
    }
    if lambda.abs() < f64::EPSILON {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

/// `points` evenly spaced values from `min` to `max` inclusive.
pub(crate) fn lambda_grid(min: f64, max: f64, points: usize) -> Result<Vec<f64>, InvalidConfigError> {
    if points < 2 || !(min < max) || !min.is_finite() || !max.is_finite() {
        return Err(InvalidConfigError::InvalidLambdaGrid { min, max, points });
    }
    let last = (points - 1) as f64;
    Ok((0..points).map(|i| min + (max - min) * i as f64 / last).collect())
}

/// Grid value whose score maximises `key`, with that score. NaN scores
/// are skipped; `(NaN, NaN)` when nothing is left.
pub(crate) fn best_on_grid<K>(lambdas: &[f64], scores: &[f64], key: K) -> (f64, f64)
where
    K: Fn(f64) -> f64,
{
    lambdas
        .iter()
        .zip(scores)
        .filter(|(_, s)| s.is_finite())
        .max_by(|a, b| key(*a.1).total_cmp(&key(*b.1)))
        .map_or((f64::NAN, f64::NAN), |(&l, &s)| (l, s))
}

fn first_non_positive(values: &[f64]) -> Option<SampleError> {
    values
        .iter()
        .enumerate()
        .find(|(_, x)| !(**x > 0.0))
        .map(|(index, &value)| SampleError::NonPositive { index, value })
}

/// Box-Cox normality plot: the normal PPCC of the transformed sample over
/// an evenly spaced grid of λ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxCoxNormality {
    /// Grid of λ values.
    pub lambdas: Vec<f64>,
    /// Normal probability plot correlation at each λ.
    pub ppcc: Vec<f64>,
    /// λ with the largest correlation.
    pub best_lambda: f64,
    /// Largest correlation.
    pub best_ppcc: f64,
}

impl BoxCoxNormality {
    /// Evaluate `points` values of λ from `min` to `max` inclusive.
    ///
    /// # Errors
    /// [`InvalidConfigError::InvalidLambdaGrid`] for fewer than two
    /// points or `min ≥ max`; [`SampleError::NonPositive`] when the sample
    /// is not strictly positive.
    pub fn search(sample: &Sample<f64>, min: f64, max: f64, points: usize) -> Result<Self, Error> {
        let lambdas = lambda_grid(min, max, points)?;
        if let Some(err) = first_non_positive(sample.as_slice()) {
            return Err(err.into());
        }

        let ppcc: Vec<f64> = lambdas
            .iter()
            .map(|&lambda| {
                let transformed: Vec<f64> = sample.iter().map(|&x| box_cox(x, lambda)).collect();
                ProbabilityPlot::normal(&transformed).ppcc()
            })
            .collect();

        let (best_lambda, best_ppcc) = best_on_grid(&lambdas, &ppcc, |r| r);
        Ok(Self { lambdas, ppcc, best_lambda, best_ppcc })
    }
}

/// Box-Cox linearity plot: the correlation of `y` with the transformed
/// predictor `T_λ(x)` over a grid of λ. The best λ maximises `r²`, so a
/// strongly negative relation counts as much as a positive one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxCoxLinearity {
    /// Grid of λ values.
    pub lambdas: Vec<f64>,
    /// Correlation of `T_λ(x)` and `y` at each λ.
    pub r: Vec<f64>,
    /// λ with the largest `r²`.
    pub best_lambda: f64,
    /// Signed correlation at `best_lambda`.
    pub best_r: f64,
}

impl BoxCoxLinearity {
    /// Evaluate `points` values of λ from `min` to `max` inclusive.
    ///
    /// # Errors
    /// [`InvalidConfigError::InvalidLambdaGrid`],
    /// [`InvalidConfigError::LengthMismatch`] when `x` and `y` are not
    /// paired, or [`SampleError::NonPositive`] for a non-positive `x`.
    pub fn search(x: &Sample<f64>, y: &[f64], min: f64, max: f64, points: usize) -> Result<Self, Error> {
        let lambdas = lambda_grid(min, max, points)?;
        if x.len() != y.len() {
            return Err(InvalidConfigError::LengthMismatch { x: x.len(), y: y.len() }.into());
        }
        if let Some(err) = first_non_positive(x.as_slice()) {
            return Err(err.into());
        }

        let r: Vec<f64> = lambdas
            .iter()
            .map(|&lambda| {
                let transformed: Vec<f64> = x.iter().map(|&v| box_cox(v, lambda)).collect();
                LineFit::fit(&transformed, y).r
            })
            .collect();

        let (best_lambda, best_r) = best_on_grid(&lambdas, &r, |r| r * r);
        Ok(Self { lambdas, r, best_lambda, best_r })
    }
}
