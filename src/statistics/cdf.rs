use std::cmp::Ordering;

use num_traits::Float;

use super::Statistic;

/// Empirical Cumulative Distribution Function (ECDF).
///
/// Represents the step function: Fₙ(x) = (1/n) * Σᵢ I(Xᵢ ≤ x)
///
/// NaN values are silently dropped at construction; the remaining values
/// are kept sorted, so the ECDF doubles as the order statistics of a sample.
#[derive(Debug, Clone)]
pub struct EmpiricalCDF<T> {
    sorted: Vec<T>,
}

impl<T> EmpiricalCDF<T> {
    /// Number of (non-NaN) observations.
    #[inline]
    pub fn n(&self) -> usize {
        self.sorted.len()
    }

    /// Order statistics, ascending.
    #[inline]
    pub fn points(&self) -> &[T] {
        &self.sorted
    }

    /// `true` when no observation survived construction.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

impl<T: Float> EmpiricalCDF<T> {
    /// Creates ECDF from float slice with NaN filtering.
    pub fn from_float_slice(data: &[T]) -> Self {
        let mut sorted: Vec<T> = data.iter()
            .copied()
            .filter(|x| !x.is_nan())
            .collect();

        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        Self { sorted }
    }

    /// Evaluates Fₙ(x).
    ///
    /// NaN for a NaN argument or an empty ECDF.
    #[inline]
    pub fn eval(&self, x: T) -> f64 {
        if x.is_nan() || self.sorted.is_empty() {
            return f64::NAN;
        }
        let idx = self.sorted.partition_point(|v| *v <= x);
        idx as f64 / self.sorted.len() as f64
    }
}

/// ECDF statistic constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct CDF;

impl<D, T> Statistic<D, EmpiricalCDF<T>> for CDF
where
    D: AsRef<[T]>,
    T: Float,
{
    #[inline]
    fn compute(&self, data: &D) -> EmpiricalCDF<T> {
        EmpiricalCDF::from_float_slice(data.as_ref())
    }
}
