//! rust_maxent — multiclass maximum-entropy classifiers with regularization
//! tuning.
//!
//! Purpose
//! -------
//! Serve as the crate root. Training minimizes a parallel, regularized
//! negative log-likelihood with argmin's L-BFGS (OWL-QN for L1), and the
//! tuning layer retrains repeatedly to pick the prior width σ or the L1
//! strength λ.
//!
//! Key behaviors
//! -------------
//! - [`optimization`]: the minimizer boundary (`DiffFunction`, `Minimizer`,
//!   `MinimizerFactory`, `LbfgsMinimizer`), finite-difference helpers, and
//!   numerically stable transforms (`log_sum_exp`, `log_cosh`, ...).
//! - [`maxent`]: datasets and indices, priors, the objective, models,
//!   scorers, the trainer, and the σ / adaptive-L1 searches.
//!
//! Invariants & assumptions
//! ------------------------
//! - The numerical layers never log; orchestration logs through the `log`
//!   facade and leaves logger installation to the application.
//! - Fallible operations return `OptResult` / `MaxentResult`; nothing in
//!   library code panics on bad input or non-finite numbers.
//!
//! Conventions
//! -----------
//! - Flat weight vectors use `f * num_classes + c`.
//! - Scores are "higher is better"; searches minimize their negation.
//!
//! Downstream usage
//! ----------------
//! - Most callers import `rust_maxent::maxent::prelude::*`.
//! - Custom optimizers plug in through `MaxentTrainer::with_factory` with
//!   any `Fn() -> M` where `M: Minimizer`.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; end-to-end pipelines are in
//!   `tests/integration_maxent_pipeline.rs`.

pub mod maxent;
pub mod optimization;
