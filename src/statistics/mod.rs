/// A quantity computed from some data `D`.
///
/// Implemented by the estimator structs of this module and, through the
/// blanket impl, by any `Fn(&D) -> T` closure.
pub trait Statistic<D, T> {
    /// Evaluate the statistic on `data`.
    fn compute(&self, data: &D) -> T;
}

impl<D, T, F> Statistic<D, T> for F
where
    F: Fn(&D) -> T,
{
    #[inline]
    fn compute(&self, data: &D) -> T {
        self(data)
    }
}

mod mean;
mod variance;
mod cdf;
mod quantile;
mod ci;
mod autocorrelation;
mod probability;
mod transform;

pub use mean::Mean;
pub use variance::Variance;
pub use cdf::{CDF, EmpiricalCDF};
pub use quantile::{Quantile, QuantileInterval, interpolated_quantile};
pub use ci::Interval;
pub use autocorrelation::{Autocorrelation, moving_average_band, randomness_band};
pub use probability::{ProbabilityPlot, TukeyLambdaPpcc, WeibullPlot, order_statistic_medians, tukey_lambda_quantile};
pub use transform::{BoxCoxLinearity, BoxCoxNormality, box_cox};
