//! models — trained classifiers, scorers, and the trainer.
//!
//! Purpose
//! -------
//! Turn flat weight vectors into usable models and produce them.
//!
//! Key behaviors
//! -------------
//! - [`classifier`]: `LinearModel` (scores, argmax, softmax over an
//!   `Example`) and `LinearClassifier<F, L>` (the same over `Datum`s, with
//!   labels returned as `L`).
//! - [`scorer`]: the `Scorer` trait plus `Accuracy` and
//!   `LogLikelihoodScorer`.
//! - [`trainer`]: `TrainerOptions` and `MaxentTrainer`.
//!
//! Conventions
//! -----------
//! - Weight matrices are `num_features × num_classes`; flat vectors use
//!   `f * num_classes + c`.

pub mod classifier;
pub mod scorer;
pub mod trainer;

pub use self::classifier::{LinearClassifier, LinearModel, to_weight_matrix};
pub use self::scorer::{Accuracy, LogLikelihoodScorer, Scorer};
pub use self::trainer::{DEFAULT_TRAINER_TOL, MaxentTrainer, TrainerOptions};
