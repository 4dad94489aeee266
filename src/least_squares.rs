//! Ordinary least-squares line through paired points.

use serde::Serialize;

use crate::statistics::{Mean, Statistic};

/// `y ≈ intercept + slope·x` together with the Pearson correlation of
/// the points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFit {
    /// Slope of the fitted line.
    pub slope: f64,
    /// Intercept of the fitted line.
    pub intercept: f64,
    /// Correlation coefficient of `x` and `y`.
    pub r: f64,
}

impl LineFit {
    /// Fit a line to the pairs `(x[i], y[i])`, truncated to the shorter
    /// slice. Fewer than two points or a constant `x` give NaN fields.
    pub fn fit(x: &[f64], y: &[f64]) -> Self {
        let (x, y): (Vec<f64>, Vec<f64>) = x.iter().zip(y).unzip();
        if x.len() < 2 {
            return Self { slope: f64::NAN, intercept: f64::NAN, r: f64::NAN };
        }

        let mx: f64 = Mean.compute(&x);
        let my: f64 = Mean.compute(&y);
        let (sxx, syy, sxy) = x.iter().zip(&y).fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (&a, &b)| {
            let (da, db) = (a - mx, b - my);
            (sxx + da * da, syy + db * db, sxy + da * db)
        });

        let slope = sxy / sxx;
        Self { slope, intercept: my - slope * mx, r: sxy / (sxx * syy).sqrt() }
    }
}
