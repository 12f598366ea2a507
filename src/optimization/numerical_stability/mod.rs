//! numerical_stability — numerically robust transforms for log-linear models.
//!
//! Purpose
//! -------
//! Collect the small numerical kernels shared by the objective, the priors
//! and the classifier so every layer computes normalizers and smooth
//! penalties the same overflow-free way.
//!
//! Key behaviors
//! -------------
//! - `log_sum_exp` / `softmax_in_place`: max-shifted normalization of class
//!   scores.
//! - `log_cosh`: smooth L1 surrogate used by the cosh prior, linear beyond
//!   `COSH_LINEAR_THRESHOLD`.
//! - `safe_softplus`: `ln(1 + eˣ)` without overflow.
//!
//! Conventions
//! -----------
//! - Pure functions on `f64` slices and scalars; no allocation, logging or
//!   I/O, suitable for tight inner loops.
//! - Inputs are assumed finite; NaN propagates rather than panicking, and
//!   callers detect it through their own validation.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] compare against naïve formulas on
//!   safe ranges and check the extreme-value behavior.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    COSH_LINEAR_THRESHOLD, log_cosh, log_sum_exp, safe_softplus, softmax_in_place,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{log_cosh, log_sum_exp, softmax_in_place};
}
