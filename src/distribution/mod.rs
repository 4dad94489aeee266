//! Parametric families and their maximum-likelihood fits.
//!
//! [`Family`] is the closed set of candidate families; [`Family::fit`]
//! validates a sample against the family and dispatches to the estimator
//! of the family module. The fitted result is a [`FittedModel`], which
//! evaluates densities, CDFs and quantiles through [`ContinuousModel`];
//! the standard families delegate those to `statrs::distribution`.

mod birnbaum_saunders;
mod gamma;
mod gaussian;
mod lognormal;
mod weibull;

pub use birnbaum_saunders::BirnbaumSaunders;
pub use gamma::Gamma;
pub use gaussian::Gaussian;
pub use lognormal::LogNormal;
pub use weibull::{Weibull, Weibull3};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FitError, InvalidConfigError, ParameterError};
use crate::math::OptimizeError;
use crate::statistics::Statistic;

/// Density, distribution and quantile function of a fitted model.
pub trait ContinuousModel {
    /// Natural log of the density at `x`; `-∞` outside the support.
    fn ln_pdf(&self, x: f64) -> f64;

    /// Cumulative distribution function.
    fn cdf(&self, x: f64) -> f64;

    /// Quantile (percent point) function; NaN for `p` outside `[0, 1]`.
    fn inverse_cdf(&self, p: f64) -> f64;

    /// Named parameter values in canonical order.
    fn parameters(&self) -> Vec<(&'static str, f64)>;

    /// Density at `x`.
    fn pdf(&self, x: f64) -> f64 {
        self.ln_pdf(x).exp()
    }

    /// Σ ln f(xᵢ).
    fn log_likelihood(&self, data: &[f64]) -> f64 {
        data.iter().map(|&x| self.ln_pdf(x)).sum()
    }
}

/// Candidate parametric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// Normal distribution (mean, standard deviation).
    Gaussian,
    /// Log-normal distribution (log-mean, log-standard deviation).
    LogNormal,
    /// Gamma distribution (shape, scale).
    Gamma,
    /// Two-parameter Weibull distribution (shape, scale).
    Weibull,
    /// Three-parameter Weibull distribution (shape, scale, location).
    Weibull3,
    /// Birnbaum-Saunders fatigue-life distribution (shape α, scale β).
    BirnbaumSaunders,
}

impl Family {
    /// Every supported family.
    pub const ALL: [Family; 6] = [
        Family::Gaussian,
        Family::LogNormal,
        Family::Gamma,
        Family::Weibull,
        Family::Weibull3,
        Family::BirnbaumSaunders,
    ];

    /// Candidates of the classical fatigue-life case study.
    pub const CASE_STUDY: [Family; 4] = [
        Family::Gaussian,
        Family::Gamma,
        Family::BirnbaumSaunders,
        Family::Weibull3,
    ];

    /// Number of free parameters `k`.
    pub const fn param_count(self) -> usize {
        match self {
            Family::Weibull3 => 3,
            Family::Gaussian
            | Family::LogNormal
            | Family::Gamma
            | Family::Weibull
            | Family::BirnbaumSaunders => 2,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Family::Gaussian => "Gaussian",
            Family::LogNormal => "Log-normal",
            Family::Gamma => "Gamma",
            Family::Weibull => "Weibull",
            Family::Weibull3 => "3-parameter Weibull",
            Family::BirnbaumSaunders => "Birnbaum-Saunders",
        }
    }

    /// Identifier accepted by [`FromStr`].
    pub const fn slug(self) -> &'static str {
        match self {
            Family::Gaussian => "gaussian",
            Family::LogNormal => "lognormal",
            Family::Gamma => "gamma",
            Family::Weibull => "weibull",
            Family::Weibull3 => "weibull3",
            Family::BirnbaumSaunders => "birnbaum-saunders",
        }
    }

    /// Support is `(0, ∞)` (or a subset of it).
    pub const fn requires_positive(self) -> bool {
        !matches!(self, Family::Gaussian)
    }

    /// Maximum-likelihood fit of this family to `data`.
    ///
    /// # Errors
    /// [`FitError::InsufficientData`] below `k + 1` observations,
    /// [`FitError::NonFinite`] / [`FitError::OutOfSupport`] for invalid
    /// observations, [`FitError::Degenerate`] for constant data or a
    /// non-finite likelihood, [`FitError::NoConvergence`] when the solver
    /// runs out of iterations.
    pub fn fit(self, data: &[f64]) -> Result<Fit, FitError> {
        self.validate(data)?;

        let model = match self {
            Family::Gaussian => FittedModel::Gaussian(gaussian::fit(data)?),
            Family::LogNormal => FittedModel::LogNormal(lognormal::fit(data)?),
            Family::Gamma => FittedModel::Gamma(gamma::fit(data)?),
            Family::Weibull => FittedModel::Weibull(weibull::fit(data)?),
            Family::Weibull3 => FittedModel::Weibull3(weibull::fit3(data)?),
            Family::BirnbaumSaunders => FittedModel::BirnbaumSaunders(birnbaum_saunders::fit(data)?),
        };

        let log_likelihood = model.log_likelihood(data);
        if !log_likelihood.is_finite() {
            return Err(FitError::Degenerate { family: self, reason: "non-finite log-likelihood" });
        }

        Ok(Fit { model, log_likelihood })
    }

    fn validate(self, data: &[f64]) -> Result<(), FitError> {
        let required = self.param_count() + 1;
        if data.len() < required {
            return Err(FitError::InsufficientData { family: self, required, actual: data.len() });
        }
        if let Some(index) = data.iter().position(|x| !x.is_finite()) {
            return Err(FitError::NonFinite { family: self, index });
        }
        if self.requires_positive() {
            if let Some((index, &value)) = data.iter().enumerate().find(|(_, x)| **x <= 0.0) {
                return Err(FitError::OutOfSupport { family: self, index, value });
            }
        }

        let (min, max) = data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        if !(max > min) {
            return Err(FitError::Degenerate { family: self, reason: "zero spread" });
        }
        Ok(())
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = InvalidConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let family = match key.as_str() {
            "gaussian" | "normal" | "norm" => Family::Gaussian,
            "lognormal" | "log-normal" | "lognorm" => Family::LogNormal,
            "gamma" => Family::Gamma,
            "weibull" | "weibull2" | "weibull-min" => Family::Weibull,
            "weibull3" | "3-parameter-weibull" | "weibull-3" => Family::Weibull3,
            "birnbaum-saunders" | "birnbaumsaunders" | "fatigue-life" | "bs" => Family::BirnbaumSaunders,
            _ => return Err(InvalidConfigError::UnknownFamily(s.to_owned())),
        };
        Ok(family)
    }
}

/// Outcome of [`Family::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fit {
    /// Fitted distribution.
    pub model: FittedModel,
    /// Achieved log-likelihood under the fitted sample.
    pub log_likelihood: f64,
}

/// A family together with its maximum-likelihood parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum FittedModel {
    /// Fitted normal distribution.
    Gaussian(Gaussian),
    /// Fitted log-normal distribution.
    LogNormal(LogNormal),
    /// Fitted gamma distribution.
    Gamma(Gamma),
    /// Fitted two-parameter Weibull distribution.
    Weibull(Weibull),
    /// Fitted three-parameter Weibull distribution.
    Weibull3(Weibull3),
    /// Fitted Birnbaum-Saunders distribution.
    BirnbaumSaunders(BirnbaumSaunders),
}

impl FittedModel {
    /// Family of this model.
    pub fn family(&self) -> Family {
        match self {
            FittedModel::Gaussian(_) => Family::Gaussian,
            FittedModel::LogNormal(_) => Family::LogNormal,
            FittedModel::Gamma(_) => Family::Gamma,
            FittedModel::Weibull(_) => Family::Weibull,
            FittedModel::Weibull3(_) => Family::Weibull3,
            FittedModel::BirnbaumSaunders(_) => Family::BirnbaumSaunders,
        }
    }

    fn inner(&self) -> &dyn ContinuousModel {
        match self {
            FittedModel::Gaussian(m) => m,
            FittedModel::LogNormal(m) => m,
            FittedModel::Gamma(m) => m,
            FittedModel::Weibull(m) => m,
            FittedModel::Weibull3(m) => m,
            FittedModel::BirnbaumSaunders(m) => m,
        }
    }
}

impl ContinuousModel for FittedModel {
    fn ln_pdf(&self, x: f64) -> f64 {
        self.inner().ln_pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.inner().cdf(x)
    }

    fn inverse_cdf(&self, p: f64) -> f64 {
        self.inner().inverse_cdf(p)
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.inner().parameters()
    }
}

impl fmt::Display for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        write!(f, "{}(", self.family())?;
        for (i, (name, value)) in self.parameters().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value:.precision$}")?;
        }
        f.write_str(")")
    }
}

/// Quantile of a fitted model, e.g. `Percentile::new(0.001)` for the
/// 0.1st percentile used in fatigue-life work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentile {
    p: f64,
}

impl Percentile {
    /// Percentile at probability `p ∈ (0, 1)`.
    ///
    /// # Errors
    /// [`InvalidConfigError::ProbabilityOutOfRange`] otherwise.
    pub fn new(p: f64) -> Result<Self, InvalidConfigError> {
        if p > 0.0 && p < 1.0 {
            Ok(Self { p })
        } else {
            Err(InvalidConfigError::ProbabilityOutOfRange(p))
        }
    }

    /// Probability level.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Statistic<FittedModel, f64> for Percentile {
    fn compute(&self, model: &FittedModel) -> f64 {
        model.inverse_cdf(self.p)
    }
}

pub(crate) fn check_param(name: &'static str, value: f64, positive: bool) -> Result<f64, ParameterError> {
    if value.is_finite() && (!positive || value > 0.0) {
        Ok(value)
    } else {
        Err(ParameterError { name, value })
    }
}

pub(crate) fn solver_error(family: Family, err: OptimizeError) -> FitError {
    match err {
        OptimizeError::DidNotConverge { iterations } => FitError::NoConvergence { family, iterations },
        OptimizeError::SameSignBracket { .. } => FitError::Degenerate { family, reason: "likelihood equation has no root" },
        OptimizeError::InvalidInterval { .. } => FitError::Degenerate { family, reason: "empty parameter interval" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parameter_counts_are_fixed() {
        let counts: Vec<usize> = Family::ALL.iter().map(|f| f.param_count()).collect();
        assert_eq!(counts, vec![2, 2, 2, 2, 3, 2]);
    }

    #[test]
    fn parses_slugs_and_aliases() {
        for family in Family::ALL {
            assert_eq!(family.slug().parse::<Family>(), Ok(family));
        }
        assert_eq!("Normal".parse::<Family>(), Ok(Family::Gaussian));
        assert_eq!("birnbaum_saunders".parse::<Family>(), Ok(Family::BirnbaumSaunders));
        assert!(matches!("cauchy".parse::<Family>(), Err(InvalidConfigError::UnknownFamily(_))));
    }

    #[test]
    fn validation_order_and_support() {
        assert!(matches!(
            Family::Weibull3.fit(&[1.0, 2.0, 3.0]),
            Err(FitError::InsufficientData { required: 4, actual: 3, .. })
        ));
        assert!(matches!(
            Family::Gamma.fit(&[1.0, f64::INFINITY, 3.0]),
            Err(FitError::NonFinite { index: 1, .. })
        ));
        assert!(matches!(
            Family::BirnbaumSaunders.fit(&[1.0, 0.0, 3.0]),
            Err(FitError::OutOfSupport { index: 1, .. })
        ));
        assert!(Family::Gaussian.fit(&[-1.0, 0.0, 3.0]).is_ok());
    }

    #[test]
    fn constant_sample_is_degenerate_for_every_family() {
        let data = [10.0; 8];
        for family in Family::ALL {
            let err = family.fit(&data).expect_err("constant data has no interior MLE");
            assert!(matches!(err, FitError::Degenerate { .. }), "{family}: {err}");
            assert_eq!(err.family(), family);
        }
    }

    #[test]
    fn percentile_statistic_reads_model_quantile() {
        let fit = Family::Gaussian.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).expect("fits");
        let median = Percentile::new(0.5).expect("valid p").compute(&fit.model);
        assert_abs_diff_eq!(median, 3.0, epsilon = 1e-9);
        assert!(Percentile::new(0.0).is_err());
        assert!(Percentile::new(1.2).is_err());
    }

    #[test]
    fn display_lists_parameters() {
        let fit = Family::Gaussian.fit(&[1.0, 2.0, 3.0]).expect("fits");
        let text = format!("{:.2}", fit.model);
        assert!(text.starts_with("Gaussian(mean=2.00, std_dev="), "{text}");
    }

    #[test]
    fn quantile_outside_unit_interval_is_nan() {
        let data = [370.0, 706.0, 716.0, 746.0, 785.0, 797.0, 844.0, 855.0, 858.0, 886.0, 886.0, 930.0];
        for family in Family::ALL {
            let model = family.fit(&data).expect("fits positive data").model;
            assert!(model.inverse_cdf(-0.1).is_nan(), "{family}");
            assert!(model.inverse_cdf(1.5).is_nan(), "{family}");
        }
    }

    #[test]
    fn every_model_quantile_inverts_its_cdf() {
        let data = [370.0, 706.0, 716.0, 746.0, 785.0, 797.0, 844.0, 855.0, 858.0, 886.0, 886.0, 930.0];
        for family in Family::ALL {
            let model = family.fit(&data).expect("fits positive data").model;
            for &p in &[0.001, 0.1, 0.5, 0.9] {
                let x = model.inverse_cdf(p);
                assert_abs_diff_eq!(model.cdf(x), p, epsilon = 1e-7);
            }
        }
    }
}
