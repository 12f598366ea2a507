//! minimizer — argmin-powered minimization of differentiable objectives.
//!
//! Purpose
//! -------
//! Provide the abstract "minimizer" capability consumed by training code,
//! plus its default implementation on top of Argmin's L-BFGS. Callers
//! implement [`DiffFunction`] and hand it to any [`Minimizer`], usually one
//! produced by a [`MinimizerFactory`].
//!
//! Key behaviors
//! -------------
//! - Define the contracts: [`DiffFunction`] (objective), [`Minimizer`]
//!   (black-box optimizer) and [`MinimizerFactory`] (fresh optimizer per
//!   run, so concurrent runs never share solver state).
//! - Implement [`LbfgsMinimizer`], which validates the starting point,
//!   selects an L-BFGS solver via [`builders`] (optionally in OWL-QN mode
//!   for L1 penalties), executes it via [`run::execute_solver`], and normalizes
//!   results into an [`OptimOutcome`].
//! - Provide finite-difference helpers in [`finite_diff`] for gradient
//!   checks and Hessian-vector products.
//! - Centralize optimizer configuration ([`Tolerances`],
//!   [`MinimizerOptions`]) and validation logic ([`validation`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are minimized as-is: the value is the cost, the gradient is
//!   the cost gradient. No sign conventions are applied in this layer.
//! - [`DiffFunction::calculate`] must treat invalid inputs as recoverable
//!   [`OptError`](crate::optimization::errors::OptError) values, not panics.
//! - Configuration types are validated on construction and treated as
//!   internally consistent by the solver layer.
//!
//! Downstream usage
//! ----------------
//! - The classifier trainer builds a `LogConditionalObjective`, asks its
//!   `MinimizerFactory` for a minimizer, and calls `minimize` with the
//!   starting weights.
//! - The adaptive L1 search uses [`LbfgsMinimizer::with_l1`] per trial.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover memoization and cost validation in
//!   [`adapter`], solver construction in [`builders`], finite-difference
//!   helpers in [`finite_diff`], option validation and closure factories in
//!   [`traits`].
//! - Integration tests exercise full solves on maximum-entropy objectives.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{
    DiffFunction, L1MinimizerFactory, LbfgsMinimizer, LineSearcher, Minimizer, MinimizerFactory,
    MinimizerOptions, OptimOutcome, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_maxent::optimization::minimizer::prelude::*;
//
// to import the main minimizer surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{
        DiffFunction, L1MinimizerFactory, LbfgsMinimizer, LineSearcher, Minimizer,
        MinimizerFactory, MinimizerOptions, OptimOutcome, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
