use serde::Serialize;
use thiserror::Error;

use crate::distribution::Family;
use crate::sample::SampleError;

/// Requested dataset name is not present in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dataset `{name}`")]
pub struct UnknownDatasetError {
    /// The name that failed to resolve.
    pub name: String,
}

/// Maximum-likelihood fit of a single family failed.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum FitError {
    /// Fewer observations than the family needs to be identifiable (k + 1).
    #[error("{family}: needs at least {required} observations, got {actual}")]
    InsufficientData {
        /// Family being fit.
        family: Family,
        /// Minimum sample size.
        required: usize,
        /// Observed sample size.
        actual: usize,
    },

    /// NaN or infinite observation.
    #[error("{family}: observation #{index} is not finite")]
    NonFinite {
        /// Family being fit.
        family: Family,
        /// Position of the offending observation.
        index: usize,
    },

    /// Observation outside the support of the family.
    #[error("{family}: observation #{index} ({value}) is outside the support")]
    OutOfSupport {
        /// Family being fit.
        family: Family,
        /// Position of the offending observation.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Likelihood has no finite interior maximum (e.g. zero spread).
    #[error("{family}: degenerate likelihood ({reason})")]
    Degenerate {
        /// Family being fit.
        family: Family,
        /// Short description of the degeneracy.
        reason: &'static str,
    },

    /// Numerical solver exhausted its iteration budget.
    #[error("{family}: optimizer did not converge after {iterations} iterations")]
    NoConvergence {
        /// Family being fit.
        family: Family,
        /// Iterations spent.
        iterations: usize,
    },
}

impl FitError {
    /// Family whose fit failed.
    pub fn family(&self) -> Family {
        match self {
            FitError::InsufficientData { family, .. }
            | FitError::NonFinite { family, .. }
            | FitError::OutOfSupport { family, .. }
            | FitError::Degenerate { family, .. }
            | FitError::NoConvergence { family, .. } => *family,
        }
    }
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidConfigError {
    /// Model selection needs at least one candidate family.
    #[error("candidate family set is empty")]
    EmptyCandidateSet,

    /// Family name not recognised.
    #[error("unknown distribution family `{0}`")]
    UnknownFamily(String),

    /// Criterion name not recognised.
    #[error("unknown information criterion `{0}` (expected `aic` or `bic`)")]
    UnknownCriterion(String),

    /// The same family was listed twice.
    #[error("family {0} listed more than once")]
    DuplicateFamily(Family),

    /// Bootstrap needs at least one resample.
    #[error("resample count must be positive")]
    ZeroResamples,

    /// Confidence level must lie strictly inside (0, 1).
    #[error("confidence level {0} is outside (0, 1)")]
    ConfidenceOutOfRange(f64),

    /// Probability must lie strictly inside (0, 1).
    #[error("probability {0} is outside (0, 1)")]
    ProbabilityOutOfRange(f64),

    /// Requested lag does not fit the series.
    #[error("lag {max_lag} is too large for a series of {len} observations")]
    InvalidLagRange {
        /// Requested maximum lag.
        max_lag: usize,
        /// Series length.
        len: usize,
    },

    /// Paired series of different lengths.
    #[error("paired series differ in length ({x} vs {y})")]
    LengthMismatch {
        /// Length of the first series.
        x: usize,
        /// Length of the second series.
        y: usize,
    },

    /// Shape-parameter search grid is empty or inverted.
    #[error("invalid lambda grid [{min}, {max}] with {points} points")]
    InvalidLambdaGrid {
        /// Lower end.
        min: f64,
        /// Upper end.
        max: f64,
        /// Number of grid points.
        points: usize,
    },
}

/// Invalid parameter handed to a distribution constructor.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parameter `{name}` = {value} is invalid")]
pub struct ParameterError {
    /// Parameter name.
    pub name: &'static str,
    /// Rejected value.
    pub value: f64,
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`UnknownDatasetError`].
    #[error(transparent)]
    UnknownDataset(#[from] UnknownDatasetError),

    /// See [`FitError`].
    #[error(transparent)]
    Fit(#[from] FitError),

    /// See [`InvalidConfigError`].
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigError),

    /// See [`SampleError`].
    #[error(transparent)]
    Sample(#[from] SampleError),

    /// Every candidate family failed to fit.
    #[error("no candidate family could be fit ({})", summarize(.0))]
    NoViableModel(Vec<FitError>),

    /// Every bootstrap resample failed model selection.
    #[error("all {0} bootstrap resamples failed model selection")]
    EmptyBootstrap(usize),
}

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

fn summarize(failures: &[FitError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
