//! maxent — multiclass log-linear (maximum-entropy) classifiers.
//!
//! Purpose
//! -------
//! Train softmax classifiers over sparse, integer-indexed features and tune
//! their regularization.
//!
//! Key behaviors
//! -------------
//! - [`core`]: indices, datasets and views, priors, and the parallel
//!   log-conditional objective.
//! - [`models`]: linear models, scorers, and `MaxentTrainer`.
//! - [`tuning`]: σ searches (held-out and cross-validated) and adaptive L1.
//! - [`errors`]: `MaxentError` / `MaxentResult`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Feature and label indices are frozen before training; every view,
//!   model and classifier built from a dataset shares those indices.
//! - Weight vectors are flat with layout `f * num_classes + c`.
//!
//! Downstream usage
//! ----------------
//! ```ignore
//! use rust_maxent::maxent::prelude::*;
//!
//! let mut data = Dataset::new();
//! data.add(Datum::new(vec!["sunny"], "play"))?;
//! data.add(Datum::new(vec!["rain"], "stay"))?;
//! data.freeze();
//! let trainer = MaxentTrainer::new(TrainerOptions::default());
//! let classifier = trainer.train_classifier(&data)?;
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/integration_maxent_pipeline.rs`
//!   covers training, σ tuning and adaptive L1 end to end.

pub mod core;
pub mod errors;
pub mod models;
pub mod tuning;

pub mod prelude {
    pub use super::core::{
        DataView, Dataset, Datum, Example, FeatureIndex, Index, LabelIndex, LikelihoodMode,
        LogConditionalObjective, LogPrior, PriorKind,
    };
    pub use super::errors::{MaxentError, MaxentResult};
    pub use super::models::{
        Accuracy, LinearClassifier, LinearModel, LogLikelihoodScorer, MaxentTrainer, Scorer,
        TrainerOptions, to_weight_matrix,
    };
    pub use super::tuning::{
        AdaptiveL1Options, CrossValidator, GoldenSectionSearch, L1Search, SigmaSearchOptions,
        SigmaTuning,
    };
}
