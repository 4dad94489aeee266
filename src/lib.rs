//! Exploratory data analysis of lifetime data.
//!
//! - [`DatasetRegistry`]: named samples, including the Birnbaum-Saunders
//!   fatigue-life data.
//! - [`Family::fit`]: maximum-likelihood fits of Gaussian, log-normal,
//!   gamma, Weibull (2 and 3 parameters) and Birnbaum-Saunders models.
//! - [`ModelSelector`]: AIC/BIC ranking with posterior model weights.
//! - [`BootstrapEstimator`]: seeded percentile-bootstrap intervals for any
//!   statistic of the selected model.
//! - EDA helpers: [`Autocorrelation`], [`ProbabilityPlot`],
//!   [`BoxCoxNormality`].
//!
//! ```
//! use edastat::{BootstrapConfig, BootstrapEstimator, DatasetRegistry, ModelSelector, Percentile};
//!
//! let sample = DatasetRegistry::builtin().load("fatigue-life")?;
//! let ranking = ModelSelector::default().rank(&sample)?;
//! println!("{ranking}");
//!
//! let config = BootstrapConfig::new(200, 0.9, 42)?;
//! let estimate = BootstrapEstimator::new(ModelSelector::default(), Percentile::new(0.001)?, config).run(&sample)?;
//! assert!(estimate.interval.is_valid());
//! # Ok::<(), edastat::Error>(())
//! ```

mod math;

pub mod dataset;
pub mod distribution;
pub mod error;
pub mod least_squares;
pub mod resample;
pub mod sample;
pub mod selection;
pub mod statistics;

mod display;

pub use dataset::{Dataset, DatasetRegistry};
pub use distribution::{ContinuousModel, Family, Fit, FittedModel, Percentile};
pub use error::{Error, FitError, InvalidConfigError, ParameterError, Result, UnknownDatasetError};
pub use resample::{Bootstrap, BootstrapConfig, BootstrapEstimate, BootstrapEstimator, Re};
pub use sample::{Sample, SampleError};
pub use selection::{Criterion, FailurePolicy, FitResult, ModelRanking, ModelSelector, RankedModel};
pub use statistics::*;
pub use rand;
