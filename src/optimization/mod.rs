//! optimization — minimizer stack, numerical helpers, and error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer consumed by model training: an abstract
//! minimizer contract with an Argmin-backed L-BFGS / OWL-QN implementation,
//! numerically stable normalization kernels, and a single error/result
//! surface.
//!
//! Key behaviors
//! -------------
//! - `minimizer`: [`DiffFunction`](minimizer::DiffFunction),
//!   [`Minimizer`](minimizer::Minimizer),
//!   [`MinimizerFactory`](minimizer::MinimizerFactory), solver builders and
//!   finite-difference helpers.
//! - `numerical_stability`: `log_sum_exp`, softmax and `log_cosh`.
//! - `errors`: [`OptError`](errors::OptError) with the common alias
//!   `OptResult<T>`; Argmin errors are converted at the boundary.
//!
//! Conventions
//! -----------
//! - Objectives are minimized directly (negative log-likelihood plus
//!   penalty).
//! - Parameters and gradients are `ndarray::Array1<f64>` aliases
//!   (`Theta`, `Grad`).
//! - This module and its submodules avoid I/O and logging; higher layers
//!   (training orchestration) report progress and soft failures.

pub mod errors;
pub mod minimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::minimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
