//! Resampling schemes and the bootstrap estimator built on them.

/// A resampling scheme: turns one data set into a stream of derived data
/// sets.
pub trait Re<T> {
    /// Type of a single resample.
    type Item;

    /// Stream of resamples of `t`.
    fn re(&self, t: &T) -> impl Iterator<Item = Self::Item>;
}

mod bootstrap;
mod estimator;

pub use bootstrap::Bootstrap;
pub use estimator::{BootstrapConfig, BootstrapEstimate, BootstrapEstimator};
