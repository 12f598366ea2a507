//! tuning — regularization searches built on repeated training.
//!
//! Purpose
//! -------
//! Pick a regularization strength by retraining: σ of the configured prior
//! by golden-section search on held-out or cross-validated score, and the
//! L1 strength λ by binary search on a target number of active features.
//!
//! Key behaviors
//! -------------
//! - [`golden_section`]: memoizing 1-D golden-section minimizer, linear or
//!   log scale.
//! - [`cross_validation`]: contiguous k-fold partitions and parallel
//!   per-fold runs.
//! - [`sigma`]: `held_out_set_sigma`, `held_out_set_sigma_split`,
//!   `cross_validate_set_sigma`, `train_classifier_tuned_sigma`.
//! - [`adaptive_l1`]: `train_adaptive_l1`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every trial gets a fresh minimizer; runs never share optimizer state.
//! - Solver and numerical failures inside a trial are recovered locally
//!   (logged, trial marked failed); configuration errors, including
//!   invalid minimizer options, abort.
//!
//! Conventions
//! -----------
//! - Searches are `impl MaxentTrainer` blocks so they reuse the trainer's
//!   options and minimizer factory.
//! - `debug!` per trial, `info!` per search result, `warn!` for recovered
//!   failures and soft stops.

pub mod adaptive_l1;
pub mod cross_validation;
pub mod golden_section;
pub mod sigma;

pub use self::adaptive_l1::{AdaptiveL1Options, L1Search, L1Trial, count_active_features};
pub use self::cross_validation::CrossValidator;
pub use self::golden_section::{GoldenSectionResult, GoldenSectionSearch};
pub use self::sigma::{SigmaSearchOptions, SigmaTrial, SigmaTuning};

use crate::{maxent::errors::MaxentError, optimization::errors::OptError};

/// Whether a failed training trial should be skipped rather than abort the
/// surrounding search.
///
/// Solver and numerical failures are local to the trial; invalid minimizer
/// options and dimension errors are not.
pub(crate) fn is_recoverable(err: &MaxentError) -> bool {
    match err {
        MaxentError::Optimization(inner) => matches!(
            inner,
            OptError::Solver { .. }
                | OptError::NonFiniteEntry { .. }
                | OptError::NonFiniteCost { .. }
                | OptError::MissingThetaHat
                | OptError::Objective { .. }
        ),
        MaxentError::NonFiniteInput { .. }
        | MaxentError::NonFiniteObjective { .. }
        | MaxentError::NonFiniteGradient { .. } => true,
        _ => false,
    }
}
