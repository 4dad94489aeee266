use std::fmt;
use std::ops::Sub;

use serde::Serialize;

/// Statistical interval with optional estimate and confidence level.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct Interval<T> {
    /// Lower bound.
    pub lower: T,
    /// Upper bound.
    pub upper: T,
    /// Point estimate, if attached.
    pub estimate: Option<T>,
    /// Confidence level in (0, 1), if attached.
    pub confidence: Option<f64>,
}

impl<T: PartialOrd + Copy> Interval<T> {
    /// Create asymmetric interval.
    #[inline]
    pub const fn new(lower: T, upper: T) -> Self {
        Self { lower, upper, estimate: None, confidence: None }
    }

    /// Fluent builder: attach point estimate.
    #[must_use]
    pub const fn estimate(mut self, estimate: T) -> Self {
        self.estimate = Some(estimate);
        self
    }

    /// Fluent builder: attach confidence level (0.0 < level < 1.0).
    #[must_use]
    pub const fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Check if value lies within `[lower, upper]` (inclusive).
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.lower <= *value && *value <= self.upper
    }

    /// Interval width: `upper - lower`.
    #[inline]
    pub fn width(&self) -> T
    where
        T: Sub<Output = T>,
    {
        self.upper - self.lower
    }

    /// Bounds ordered and confidence, if any, inside (0, 1).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lower <= self.upper && self.confidence.is_none_or(|c| c > 0.0 && c < 1.0)
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        if let Some(est) = &self.estimate {
            write!(f, "{est:.precision$} ∈ ")?;
        }
        write!(f, "[{:.precision$}, {:.precision$}]", self.lower, self.upper)?;
        if let Some(conf) = self.confidence {
            write!(f, " with {conf:.2}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_validity() {
        let interval = Interval::new(1.0, 3.0).estimate(2.0).confidence(0.95);
        assert!(interval.is_valid());
        assert!(interval.contains(&3.0));
        assert!(!interval.contains(&3.5));
        assert!(!Interval::new(1.0, 3.0).confidence(1.0).is_valid());
        assert!(!Interval::new(4.0, 3.0).is_valid());
    }

    #[test]
    fn display_uses_requested_precision() {
        let interval = Interval::new(1.0, 3.0).estimate(2.0).confidence(0.95);
        assert_eq!(format!("{interval:.1}"), "2.0 ∈ [1.0, 3.0] with 0.95");
        assert_eq!(format!("{}", Interval::new(0.5, 1.5)), "[0.5000, 1.5000]");
    }
}
