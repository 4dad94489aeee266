use num_traits::{Float, FromPrimitive};

use super::{Mean, Statistic};

/// Variance with a configurable delta degrees of freedom.
#[derive(Debug, Clone, Copy)]
pub struct Variance {
    /// Subtracted from `n` in the denominator.
    pub ddof: usize,
}

impl Variance {
    /// Creates a new `Variance` estimator with the given degrees of freedom adjustment.
    ///
    /// - `ddof = 0`: population variance, the maximum-likelihood estimate
    /// - `ddof = 1`: sample variance (Bessel's correction), the default
    pub fn new(ddof: usize) -> Self {
        Variance { ddof }
    }

    /// Population (maximum-likelihood) variance, `ddof = 0`.
    pub fn population() -> Self {
        Variance { ddof: 0 }
    }
}

impl Default for Variance {
    fn default() -> Self {
        Variance { ddof: 1 }
    }
}

impl<D, T> Statistic<D, T> for Variance
where
    D: AsRef<[T]>,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let slice = data.as_ref();

        if slice.len() <= self.ddof {
            return T::nan();
        }

        let mean: T = Mean.compute(data);

        // Kahan summation for squared deviations
        let mut sq_sum = T::zero();
        let mut c2 = T::zero();
        for &x in slice {
            let dev = x - mean;
            let y = dev * dev - c2;
            let t = sq_sum + y;
            c2 = (t - sq_sum) - y;
            sq_sum = t;
        }

        match T::from_usize(slice.len() - self.ddof) {
            Some(dof) => sq_sum / dof,
            None => T::nan(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sample_and_population_variance() {
        let data = [2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let population: f64 = Variance::population().compute(&data);
        let sample: f64 = Variance::default().compute(&data);
        assert_abs_diff_eq!(population, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sample, 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn too_few_observations_is_nan() {
        let v: f64 = Variance::default().compute(&[1.0_f64]);
        assert!(v.is_nan());
    }
}
