//! core — data contract, priors, and the training objective.
//!
//! Purpose
//! -------
//! Hold the numerical heart of maximum-entropy training: the frozen data
//! view consumed by the objective, the regularization priors, and the
//! objective itself. Nothing here logs or talks to a minimizer directly;
//! the objective only implements
//! [`DiffFunction`](crate::optimization::minimizer::DiffFunction).
//!
//! Key behaviors
//! -------------
//! - [`index`]: append-only, lockable identifier ↔ id mappings.
//! - [`dataset`]: `Datum`, the growable `Dataset`, and the validated
//!   `DataView` (plus split/fold helpers).
//! - [`prior`]: `PriorKind` / `LogPrior` penalties with batch rescaling.
//! - [`objective`]: `LogConditionalObjective` with its cached derivative
//!   numerator, parallel evaluation, minibatch and Hessian-vector products.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weight vectors are flat with layout `f * num_classes + c`.
//! - Views are built only from frozen indices and never change afterwards,
//!   so concurrent evaluation needs no locking.

pub mod dataset;
pub mod index;
pub mod objective;
pub mod prior;

pub use self::dataset::{DataView, Dataset, Datum, Example};
pub use self::index::{FeatureIndex, Index, LabelIndex};
pub use self::objective::{LikelihoodMode, LogConditionalObjective, MIN_EXAMPLES_PER_WORKER};
pub use self::prior::{LogPrior, PriorKind, expand_per_feature};
