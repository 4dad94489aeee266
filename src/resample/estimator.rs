use serde::Serialize;

use super::Bootstrap;
use crate::distribution::FittedModel;
use crate::error::{Error, InvalidConfigError, Result};
use crate::sample::Sample;
use crate::selection::ModelSelector;
use crate::statistics::{CDF, EmpiricalCDF, Interval, QuantileInterval, Statistic};

/// Resample count, confidence level and seed of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootstrapConfig {
    resamples: usize,
    confidence: f64,
    seed: u64,
}

impl BootstrapConfig {
    /// # Errors
    /// [`InvalidConfigError::ZeroResamples`] or
    /// [`InvalidConfigError::ConfidenceOutOfRange`].
    pub fn new(resamples: usize, confidence: f64, seed: u64) -> std::result::Result<Self, InvalidConfigError> {
        if resamples == 0 {
            return Err(InvalidConfigError::ZeroResamples);
        }
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(InvalidConfigError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self { resamples, confidence, seed })
    }

    /// Number of resamples `B`.
    pub fn resamples(&self) -> usize {
        self.resamples
    }

    /// Two-sided confidence level.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Master seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self { resamples: 5000, confidence: 0.95, seed: 0 }
    }
}

/// Result of [`BootstrapEstimator::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapEstimate {
    /// Statistic of every retained resample, in resample-index order.
    pub estimates: Vec<f64>,
    /// Percentile interval, carrying the full-sample estimate and the
    /// confidence level.
    pub interval: Interval<f64>,
    /// Resamples drawn.
    pub resamples: usize,
    /// Resamples dropped because model selection failed on them.
    pub excluded: usize,
}

impl BootstrapEstimate {
    /// Statistic on the original sample.
    pub fn point(&self) -> f64 {
        self.interval.estimate.unwrap_or(f64::NAN)
    }
}

/// Bootstrap distribution of a statistic of the selected model.
///
/// Each resample is ranked with the selector and the statistic is
/// evaluated on its top-ranked model, so the spread reflects both
/// parameter and model uncertainty.
#[derive(Debug, Clone)]
pub struct BootstrapEstimator<S> {
    selector: ModelSelector,
    statistic: S,
    config: BootstrapConfig,
}

impl<S> BootstrapEstimator<S>
where
    S: Statistic<FittedModel, f64> + Sync,
{
    /// Estimator of `statistic` under `selector`.
    pub fn new(selector: ModelSelector, statistic: S, config: BootstrapConfig) -> Self {
        Self { selector, statistic, config }
    }

    /// Run configuration.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Bootstrap `sample`.
    ///
    /// # Errors
    /// Selection errors on the original sample propagate;
    /// [`Error::EmptyBootstrap`] when no resample could be evaluated.
    pub fn run(&self, sample: &Sample<f64>) -> Result<BootstrapEstimate> {
        let best = self.selector.rank(sample)?;
        let point = self.statistic.compute(&best.best().model);

        let outcomes = self.evaluate(sample);
        let resamples = outcomes.len();
        let estimates: Vec<f64> = outcomes.into_iter().flatten().collect();
        let excluded = resamples - estimates.len();
        if estimates.is_empty() {
            return Err(Error::EmptyBootstrap(resamples));
        }

        let ecdf: EmpiricalCDF<f64> = CDF.compute(&estimates);
        let (lower, upper) = QuantileInterval::percentile(self.config.confidence).compute(&ecdf);
        let interval = Interval::new(lower, upper).estimate(point).confidence(self.config.confidence);

        log::info!("bootstrap: {resamples} resamples, {excluded} excluded, {interval}");

        Ok(BootstrapEstimate { estimates, interval, resamples, excluded })
    }

    /// Statistic of resample `index`, `None` when it is excluded.
    fn evaluate_one(&self, data: Sample<f64>, index: usize) -> Option<f64> {
        match self.selector.rank(&data) {
            Ok(ranking) => {
                let value = self.statistic.compute(&ranking.best().model);
                if value.is_finite() {
                    Some(value)
                } else {
                    log::debug!("resample {index}: non-finite statistic {value}");
                    None
                }
            }
            Err(err) => {
                log::debug!("resample {index} excluded: {err}");
                None
            }
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn evaluate(&self, sample: &Sample<f64>) -> Vec<Option<f64>> {
        use super::Re;

        Bootstrap::new(self.config.seed)
            .re(sample)
            .take(self.config.resamples)
            .enumerate()
            .map(|(index, resample)| self.evaluate_one(resample, index))
            .collect()
    }

    #[cfg(feature = "rayon")]
    fn evaluate(&self, sample: &Sample<f64>) -> Vec<Option<f64>> {
        use rayon::prelude::*;

        let data = sample.as_slice();
        let seeds: Vec<u64> = Bootstrap::new(self.config.seed).sub_seeds().take(self.config.resamples).collect();

        // indexed collect keeps resample order
        seeds
            .into_par_iter()
            .enumerate()
            .map(|(index, sub_seed)| self.evaluate_one(Bootstrap::resample(data, sub_seed), index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{ContinuousModel, Family, Percentile};
    use crate::resample::Re;
    use approx::assert_abs_diff_eq;

    const COUPONS: [f64; 24] = [
        370.0, 706.0, 716.0, 746.0, 785.0, 797.0, 844.0, 855.0, 858.0, 886.0, 886.0, 930.0, 960.0, 988.0, 990.0,
        1000.0, 1010.0, 1016.0, 1018.0, 1020.0, 1055.0, 1085.0, 1102.0, 1102.0,
    ];

    fn estimator(seed: u64) -> BootstrapEstimator<Percentile> {
        let selector = ModelSelector::new([Family::Gaussian, Family::BirnbaumSaunders]).expect("valid");
        let config = BootstrapConfig::new(60, 0.9, seed).expect("valid");
        BootstrapEstimator::new(selector, Percentile::new(0.001).expect("valid p"), config)
    }

    #[test]
    fn fixed_seed_is_bit_identical() {
        let sample = Sample::new(COUPONS.to_vec());
        let a = estimator(2024).run(&sample).expect("runs");
        let b = estimator(2024).run(&sample).expect("runs");

        let bits = |e: &BootstrapEstimate| e.estimates.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a.interval.lower.to_bits(), b.interval.lower.to_bits());
        assert_eq!(a.interval.upper.to_bits(), b.interval.upper.to_bits());

        let c = estimator(2025).run(&sample).expect("runs");
        assert_ne!(bits(&a), bits(&c));
    }

    #[test]
    fn interval_brackets_estimates() {
        let sample = Sample::new(COUPONS.to_vec());
        let estimate = estimator(1).run(&sample).expect("runs");

        assert_eq!(estimate.resamples, 60);
        assert_eq!(estimate.estimates.len() + estimate.excluded, 60);
        assert!(estimate.interval.is_valid());
        assert_eq!(estimate.interval.confidence, Some(0.9));

        let min = estimate.estimates.iter().copied().fold(f64::INFINITY, f64::min);
        let max = estimate.estimates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(estimate.interval.lower >= min && estimate.interval.upper <= max);
    }

    #[test]
    fn point_estimate_uses_full_sample() {
        let sample = Sample::new(COUPONS.to_vec());
        let estimate = estimator(5).run(&sample).expect("runs");
        let ranking = ModelSelector::new([Family::Gaussian, Family::BirnbaumSaunders])
            .expect("valid")
            .rank(&sample)
            .expect("ranks");
        assert_abs_diff_eq!(estimate.point(), ranking.best().model.inverse_cdf(0.001), epsilon = 1e-12);
    }

    #[test]
    fn closures_are_statistics() {
        let sample = Sample::new(COUPONS.to_vec());
        let selector = ModelSelector::new([Family::Gaussian]).expect("valid");
        let median = |model: &FittedModel| model.inverse_cdf(0.5);
        let estimate = BootstrapEstimator::new(selector, median, BootstrapConfig::new(40, 0.95, 9).expect("valid"))
            .run(&sample)
            .expect("runs");
        assert_eq!(estimate.excluded, 0);
        assert!(estimate.interval.contains(&estimate.point()));
    }

    #[test]
    fn failing_original_sample_propagates() {
        let sample = Sample::new(vec![-1.0, 2.0, 3.0, 4.0]);
        let selector = ModelSelector::new([Family::Gamma]).expect("valid");
        let result = BootstrapEstimator::new(selector, Percentile::new(0.5).expect("valid p"), BootstrapConfig::default())
            .run(&sample);
        assert!(matches!(result, Err(Error::NoViableModel(_))));
    }

    #[test]
    fn constant_resamples_are_excluded_in_order() {
        // (7/8)^8 of the resamples draw only ones, which has no Gaussian fit
        let sample = Sample::new(vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0]);
        let selector = ModelSelector::new([Family::Gaussian]).expect("valid");
        let statistic = Percentile::new(0.1).expect("valid p");
        let config = BootstrapConfig::new(200, 0.9, 3).expect("valid");
        let estimate = BootstrapEstimator::new(selector.clone(), statistic, config)
            .run(&sample)
            .expect("some resamples fit");

        assert!(estimate.excluded > 0);
        assert_eq!(estimate.estimates.len() + estimate.excluded, 200);

        let expected: Vec<u64> = Bootstrap::new(3)
            .re(&sample)
            .take(200)
            .filter_map(|resample| selector.rank(&resample).ok())
            .map(|ranking| statistic.compute(&ranking.best().model))
            .filter(|value| value.is_finite())
            .map(f64::to_bits)
            .collect();
        let actual: Vec<u64> = estimate.estimates.iter().map(|x| x.to_bits()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn all_excluded_is_an_error() {
        let sample = Sample::new(COUPONS.to_vec());
        let selector = ModelSelector::new([Family::Gaussian]).expect("valid");
        let nan = |_: &FittedModel| f64::NAN;
        let result = BootstrapEstimator::new(selector, nan, BootstrapConfig::new(25, 0.95, 4).expect("valid"))
            .run(&sample);
        assert!(matches!(result, Err(Error::EmptyBootstrap(25))));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_serial_order() {
        let sample = Sample::new(COUPONS.to_vec());
        let estimator = estimator(11);
        let serial: Vec<Option<u64>> = Bootstrap::new(11)
            .re(&sample)
            .take(60)
            .enumerate()
            .map(|(index, resample)| estimator.evaluate_one(resample, index).map(f64::to_bits))
            .collect();
        let parallel: Vec<Option<u64>> = estimator.evaluate(&sample).into_iter().map(|v| v.map(f64::to_bits)).collect();
        assert_eq!(parallel, serial);
    }

    #[test]
    fn config_validation() {
        assert_eq!(BootstrapConfig::new(0, 0.9, 1), Err(InvalidConfigError::ZeroResamples));
        assert_eq!(BootstrapConfig::new(10, 1.0, 1), Err(InvalidConfigError::ConfidenceOutOfRange(1.0)));
        let config = BootstrapConfig::default();
        assert_eq!((config.resamples(), config.seed()), (5000, 0));
        assert_abs_diff_eq!(config.confidence(), 0.95);
    }
}
