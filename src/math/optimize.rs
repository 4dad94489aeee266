use thiserror::Error;

/// Tolerances for the scalar solvers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScalarOptions {
    /// Absolute bracket width at which to stop.
    pub tol: f64,
    /// Relative bracket width at which to stop.
    pub rtol: f64,
    /// Iteration budget.
    pub max_iter: usize,
}

impl Default for ScalarOptions {
    fn default() -> Self {
        Self { tol: 1e-12, rtol: 1e-12, max_iter: 200 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub(crate) enum OptimizeError {
    #[error("invalid interval [{a}, {b}]")]
    InvalidInterval { a: f64, b: f64 },

    #[error("f(a) = {fa} and f(b) = {fb} have the same sign")]
    SameSignBracket { fa: f64, fb: f64 },

    #[error("did not converge after {iterations} iterations")]
    DidNotConverge { iterations: usize },
}

/// Outcome of a scalar solve.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Solution {
    pub x: f64,
    pub value: f64,
}

impl ScalarOptions {
    #[inline]
    fn converged(&self, width: f64, scale: f64) -> bool {
        width.abs() < self.tol || width.abs() < self.rtol * scale.abs().max(f64::MIN_POSITIVE)
    }
}

/// Bisection root finding on `[a, b]`.
///
/// `f(a)` and `f(b)` must bracket a sign change; a bracket end that is an
/// exact root is returned immediately.
pub(crate) fn bisect<F>(f: F, a: f64, b: f64, options: &ScalarOptions) -> Result<Solution, OptimizeError>
where
    F: Fn(f64) -> f64,
{
    if !(a < b) {
        return Err(OptimizeError::InvalidInterval { a, b });
    }

    let fa = f(a);
    let fb = f(b);
    if fa.abs() <= 0.0 {
        return Ok(Solution { x: a, value: fa });
    }
    if fb.abs() <= 0.0 {
        return Ok(Solution { x: b, value: fb });
    }
    if (fa > 0.0) == (fb > 0.0) || fa.is_nan() || fb.is_nan() {
        return Err(OptimizeError::SameSignBracket { fa, fb });
    }

    let mut left = a;
    let mut right = b;
    let mut f_left = fa;

    for _ in 0..options.max_iter {
        let mid = 0.5 * (left + right);
        let f_mid = f(mid);

        if f_mid.abs() <= 0.0 || options.converged(right - left, mid) {
            return Ok(Solution { x: mid, value: f_mid });
        }

        if (f_mid > 0.0) == (f_left > 0.0) {
            left = mid;
            f_left = f_mid;
        } else {
            right = mid;
        }
    }

    Err(OptimizeError::DidNotConverge { iterations: options.max_iter })
}

/// Golden section search for the minimum of a unimodal `f` on `[a, b]`.
pub(crate) fn golden_section<F>(f: F, a: f64, b: f64, options: &ScalarOptions) -> Result<Solution, OptimizeError>
where
    F: Fn(f64) -> f64,
{
    if !(a < b) {
        return Err(OptimizeError::InvalidInterval { a, b });
    }

    // 1/φ and 1 - 1/φ
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let inv_phi2 = 1.0 - inv_phi;

    let mut a = a;
    let mut b = b;
    let mut x1 = a + inv_phi2 * (b - a);
    let mut x2 = a + inv_phi * (b - a);
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    for _ in 0..options.max_iter {
        if options.converged(b - a, a.abs().max(b.abs())) {
            let x = 0.5 * (a + b);
            return Ok(Solution { x, value: f(x) });
        }

        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = a + inv_phi2 * (b - a);
            f1 = f(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + inv_phi * (b - a);
            f2 = f(x2);
        }
    }

    Err(OptimizeError::DidNotConverge { iterations: options.max_iter })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn bisect_finds_sqrt_two() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, &ScalarOptions::default()).expect("bracketed");
        assert_abs_diff_eq!(root.x, 2.0_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn bisect_rejects_unbracketed() {
        let err = bisect(|x| x * x + 1.0, -1.0, 1.0, &ScalarOptions::default()).unwrap_err();
        assert!(matches!(err, OptimizeError::SameSignBracket { .. }));
        let err = bisect(|x| x, 1.0, 1.0, &ScalarOptions::default()).unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidInterval { .. }));
    }

    #[test]
    fn golden_section_minimises_quadratic() {
        let min = golden_section(|x| (x - 1.5).powi(2) + 3.0, 0.0, 4.0, &ScalarOptions::default())
            .expect("unimodal");
        assert_abs_diff_eq!(min.x, 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(min.value, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let options = ScalarOptions { tol: 0.0, rtol: 0.0, max_iter: 5 };
        let err = golden_section(|x| x * x, -1.0, 1.0, &options).unwrap_err();
        assert_eq!(err, OptimizeError::DidNotConverge { iterations: 5 });
    }
}
