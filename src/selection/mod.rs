//! Information-criterion model selection over a set of candidate families.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::distribution::{Family, Fit, FittedModel};
use crate::error::{Error, FitError, InvalidConfigError, Result};
use crate::sample::Sample;

/// Ranking criterion. Both are "smaller is better".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Criterion {
    /// `2k - 2·logL`
    Aic,
    /// `k·ln(n) - 2·logL`
    #[default]
    Bic,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Criterion::Aic => "AIC",
            Criterion::Bic => "BIC",
        })
    }
}

impl FromStr for Criterion {
    type Err = InvalidConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aic" => Ok(Criterion::Aic),
            "bic" => Ok(Criterion::Bic),
            _ => Err(InvalidConfigError::UnknownCriterion(s.to_owned())),
        }
    }
}

/// What [`ModelSelector::rank`] does with a family that fails to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FailurePolicy {
    /// Drop the family and record its error in the ranking.
    #[default]
    Exclude,
    /// Abort the ranking with the first error.
    Propagate,
}

/// A successful fit scored by both criteria.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitResult {
    /// Fitted model.
    pub model: FittedModel,
    /// Log-likelihood of the sample under `model`.
    pub log_likelihood: f64,
    /// Sample size.
    pub n: usize,
    /// Number of free parameters.
    pub param_count: usize,
    /// Akaike information criterion.
    pub aic: f64,
    /// Bayesian information criterion.
    pub bic: f64,
}

impl FitResult {
    fn new(fit: Fit, n: usize) -> Self {
        let k = fit.model.family().param_count() as f64;
        let two_ll = 2.0 * fit.log_likelihood;
        Self {
            model: fit.model,
            log_likelihood: fit.log_likelihood,
            n,
            param_count: fit.model.family().param_count(),
            aic: 2.0 * k - two_ll,
            bic: k * (n as f64).ln() - two_ll,
        }
    }

    /// Family of the fitted model.
    pub fn family(&self) -> Family {
        self.model.family()
    }

    /// Value of `criterion`.
    pub fn score(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Aic => self.aic,
            Criterion::Bic => self.bic,
        }
    }
}

/// A ranked fit and its BIC posterior weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedModel {
    /// The fit.
    pub result: FitResult,
    /// `exp(-ΔBIC/2)`, normalised over the ranking.
    pub weight: f64,
}

/// Outcome of [`ModelSelector::rank`]: successful fits in ascending
/// criterion order, never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRanking {
    #[serde(skip)]
    best: FitResult,
    entries: Vec<RankedModel>,
    failures: Vec<FitError>,
    criterion: Criterion,
    sample_size: usize,
}

impl ModelRanking {
    /// `None` for an empty `entries`.
    fn new(entries: Vec<RankedModel>, failures: Vec<FitError>, criterion: Criterion, sample_size: usize) -> Option<Self> {
        let best = entries.first()?.result;
        Some(Self { best, entries, failures, criterion, sample_size })
    }

    /// Top-ranked fit.
    pub fn best(&self) -> &FitResult {
        &self.best
    }

    /// Ranked fits, best first.
    pub fn entries(&self) -> &[RankedModel] {
        &self.entries
    }

    /// Iterate over the ranked fits, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedModel> {
        self.entries.iter()
    }

    /// Posterior weights in ranking order.
    pub fn weights(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.weight).collect()
    }

    /// Entry of `family`, if it was fit.
    pub fn get(&self, family: Family) -> Option<&RankedModel> {
        self.entries.iter().find(|e| e.result.family() == family)
    }

    /// Errors of the families excluded from the ranking.
    pub fn failures(&self) -> &[FitError] {
        &self.failures
    }

    /// Criterion the ranking is sorted by.
    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    /// Number of observations that were fit.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl<'a> IntoIterator for &'a ModelRanking {
    type Item = &'a RankedModel;
    type IntoIter = std::slice::Iter<'a, RankedModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fits every candidate family and ranks the fits by AIC or BIC.
///
/// ```
/// use edastat::{DatasetRegistry, ModelSelector, Criterion, Family};
///
/// let sample = DatasetRegistry::builtin().load("fatigue-life").unwrap();
/// let ranking = ModelSelector::new([Family::Gaussian, Family::BirnbaumSaunders])
///     .unwrap()
///     .criterion(Criterion::Aic)
///     .rank(&sample)
///     .unwrap();
/// assert_eq!(ranking.entries().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSelector {
    families: Vec<Family>,
    criterion: Criterion,
    failure_policy: FailurePolicy,
}

impl ModelSelector {
    /// Selector over `families`, in that order for tie-breaking.
    ///
    /// # Errors
    /// [`InvalidConfigError::EmptyCandidateSet`] or
    /// [`InvalidConfigError::DuplicateFamily`].
    pub fn new<I>(families: I) -> std::result::Result<Self, InvalidConfigError>
    where
        I: IntoIterator<Item = Family>,
    {
        let mut unique: Vec<Family> = Vec::new();
        for family in families {
            if unique.contains(&family) {
                return Err(InvalidConfigError::DuplicateFamily(family));
            }
            unique.push(family);
        }
        if unique.is_empty() {
            return Err(InvalidConfigError::EmptyCandidateSet);
        }

        Ok(Self { families: unique, criterion: Criterion::default(), failure_policy: FailurePolicy::default() })
    }

    /// Rank by `criterion`.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Handle fit failures according to `policy`.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Candidate families.
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    /// Fit, score and rank every candidate on `sample`.
    ///
    /// # Errors
    /// [`Error::Fit`] under [`FailurePolicy::Propagate`];
    /// [`Error::NoViableModel`] when no family could be fit.
    pub fn rank(&self, sample: &Sample<f64>) -> Result<ModelRanking> {
        let data = sample.as_slice();
        let n = data.len();

        let mut results = Vec::with_capacity(self.families.len());
        let mut failures = Vec::new();
        for &family in &self.families {
            match family.fit(data) {
                Ok(fit) => results.push(FitResult::new(fit, n)),
                Err(err) => match self.failure_policy {
                    FailurePolicy::Propagate => return Err(err.into()),
                    FailurePolicy::Exclude => {
                        log::debug!("excluding {family} from ranking: {err}");
                        failures.push(err);
                    }
                },
            }
        }
        let criterion = self.criterion;
        results.sort_by(|a, b| a.score(criterion).total_cmp(&b.score(criterion)));

        let min_bic = results.iter().map(|r| r.bic).fold(f64::INFINITY, f64::min);
        let raw: Vec<f64> = results.iter().map(|r| (-(r.bic - min_bic) / 2.0).exp()).collect();
        let total: f64 = raw.iter().sum();

        let entries = results
            .into_iter()
            .zip(raw)
            .map(|(result, w)| RankedModel { result, weight: w / total })
            .collect();

        match ModelRanking::new(entries, failures.clone(), criterion, n) {
            Some(ranking) => Ok(ranking),
            None => Err(Error::NoViableModel(failures)),
        }
    }
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self {
            families: Family::CASE_STUDY.to_vec(),
            criterion: Criterion::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}
