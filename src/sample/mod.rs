mod read;

pub use read::SampleError;

use serde::Serialize;

use crate::statistics::Statistic;

/// Ordered, immutable sequence of observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sample<T> {
    data: Vec<T>,
}

impl<T> Sample<T> {
    /// Create a new sample from raw data
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Get the number of observations in the sample
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the sample contains no observations
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Observations in their original order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over the observations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Estimate a statistic from the sample data
    pub fn estimate<Output>(&self, statistic: &impl Statistic<Self, Output>) -> Output {
        statistic.compute(self)
    }
}

impl Sample<f64> {
    /// Validating constructor: at least one observation, all finite.
    ///
    /// # Errors
    /// [`SampleError::Empty`] for no data, [`SampleError::NonFinite`] for
    /// NaN or infinite values.
    pub fn try_new(data: Vec<f64>) -> Result<Self, SampleError> {
        if data.is_empty() {
            return Err(SampleError::Empty);
        }
        if let Some(index) = data.iter().position(|x| !x.is_finite()) {
            return Err(SampleError::NonFinite { index });
        }
        Ok(Self { data })
    }
}

impl<T> FromIterator<T> for Sample<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Sample::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Sample<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Sample<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T> AsRef<[T]> for Sample<T> {
    fn as_ref(&self) -> &[T] { &self.data }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_empty_and_non_finite() {
        assert!(matches!(Sample::try_new(vec![]), Err(SampleError::Empty)));
        assert!(matches!(
            Sample::try_new(vec![1.0, f64::NAN, 3.0]),
            Err(SampleError::NonFinite { index: 1 })
        ));
        assert_eq!(Sample::try_new(vec![1.0, 2.0]).map(|s| s.len()).ok(), Some(2));
    }

    #[test]
    fn preserves_observation_order() {
        let sample: Sample<f64> = [3.0, 1.0, 2.0].into_iter().collect();
        let bits: Vec<u64> = sample.iter().map(|x| x.to_bits()).collect();
        assert_eq!(bits, vec![3.0_f64.to_bits(), 1.0_f64.to_bits(), 2.0_f64.to_bits()]);
    }
}
