use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::InvalidConfigError;

use super::{Mean, Statistic};

/// Sample autocorrelation function
///
/// ```text
/// R[h] = C[h] / C[0],   C[h] = 1/N Σ_{t=1}^{N-h} (Yₜ - Ȳ)(Yₜ₊ₕ - Ȳ)
/// ```
///
/// for lags `0..=max_lag`. Without an explicit `max_lag` every lag up to
/// `N - 2` is computed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autocorrelation {
    /// Largest lag; `None` means `N - 2`.
    pub max_lag: Option<usize>,
}

impl Autocorrelation {
    /// Autocorrelation up to and including lag `max_lag`.
    pub fn new(max_lag: usize) -> Self {
        Self { max_lag: Some(max_lag) }
    }

    /// Coefficients `R[0..=max_lag]` of `series`. A constant series has
    /// `C[0] = 0` and yields NaN coefficients.
    ///
    /// # Errors
    /// [`InvalidConfigError::InvalidLagRange`] when the series is shorter
    /// than two observations or `max_lag ≥ N`.
    pub fn coefficients(&self, series: &[f64]) -> Result<Vec<f64>, InvalidConfigError> {
        let len = series.len();
        let max_lag = match self.max_lag {
            Some(lag) => lag,
            None => len.saturating_sub(2),
        };
        if len < 2 || max_lag >= len {
            return Err(InvalidConfigError::InvalidLagRange { max_lag, len });
        }

        let mean: f64 = Mean.compute(&series);
        let centered: Vec<f64> = series.iter().map(|y| y - mean).collect();
        let n = len as f64;

        let autocovariance = |h: usize| -> f64 {
            centered.iter().zip(centered.iter().skip(h)).map(|(a, b)| a * b).sum::<f64>() / n
        };

        let c0 = autocovariance(0);
        Ok((0..=max_lag).map(|h| autocovariance(h) / c0).collect())
    }
}

/// Two-sided band `±z/√N` outside which a coefficient is significant
/// under the hypothesis of a purely random series.
///
/// # Errors
/// [`InvalidConfigError::ConfidenceOutOfRange`] unless `0 < confidence < 1`.
pub fn randomness_band(n: usize, confidence: f64) -> Result<f64, InvalidConfigError> {
    Ok(two_sided_z(confidence)? / (n as f64).sqrt())
}

/// Bartlett band for identifying the order of a moving-average model:
/// entry `h` is `z/√N · √(1 + 2 Σ_{0<i<h} R[i]²)`, the band that `R[h]`
/// must leave for the MA order to exceed `h - 1`.
///
/// # Errors
/// [`InvalidConfigError::ConfidenceOutOfRange`] unless `0 < confidence < 1`.
pub fn moving_average_band(coefficients: &[f64], n: usize, confidence: f64) -> Result<Vec<f64>, InvalidConfigError> {
    let base = randomness_band(n, confidence)?;

    let mut cumulative = 0.0_f64;
    let mut band = Vec::with_capacity(coefficients.len());
    for (h, r) in coefficients.iter().enumerate() {
        band.push(base * (1.0 + 2.0 * cumulative).sqrt());
        if h > 0 {
            cumulative += r * r;
        }
    }
    Ok(band)
}

fn two_sided_z(confidence: f64) -> Result<f64, InvalidConfigError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(InvalidConfigError::ConfidenceOutOfRange(confidence));
    }
    Ok(Normal::standard().inverse_cdf(1.0 - (1.0 - confidence) / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn lag_zero_is_one() {
        let series = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let r = Autocorrelation::default().coefficients(&series).expect("valid lags");
        assert_eq!(r.len(), series.len() - 1);
        assert_abs_diff_eq!(r.first().copied().unwrap_or(f64::NAN), 1.0, epsilon = 1e-12);
        assert!(r.iter().all(|c| c.abs() <= 1.0 + 1e-12));
    }

    #[test]
    fn alternating_series_is_negatively_correlated() {
        let series = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let r = Autocorrelation::new(2).coefficients(&series).expect("valid lags");
        // C[1] = -5/6, C[0] = 1
        let expected = [1.0, -5.0 / 6.0, 4.0 / 6.0];
        assert_eq!(r.len(), expected.len());
        for (got, want) in r.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_lag_beyond_series() {
        let err = Autocorrelation::new(5).coefficients(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, InvalidConfigError::InvalidLagRange { max_lag: 5, len: 3 });
        assert!(Autocorrelation::default().coefficients(&[1.0]).is_err());
    }

    #[test]
    fn bands() {
        let band = randomness_band(100, 0.95).expect("valid confidence");
        assert_abs_diff_eq!(band, 0.195_996_4, epsilon = 1e-6);

        // R[0] never enters the sum: entries 0 and 1 equal the randomness band
        let ma = moving_average_band(&[1.0, 0.5, 0.5], 100, 0.95).expect("valid confidence");
        let expected = [band, band, band * 1.5_f64.sqrt()];
        assert_eq!(ma.len(), expected.len());
        for (got, want) in ma.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }

        assert!(randomness_band(10, 1.0).is_err());
    }
}
