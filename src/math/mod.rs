//! Numerical building blocks shared by the estimators.
//!
//! Scalar root finding and minimisation follow the classic bracketed
//! algorithms: they never leave the initial bracket, which is what the
//! likelihood equations in `distribution` rely on.

mod optimize;

pub(crate) use optimize::{OptimizeError, ScalarOptions, bisect, golden_section};
