//! Errors for maximum-entropy training (indices, data views, priors,
//! objective evaluation, options, and tuning searches).
//!
//! This module defines [`MaxentError`] and the alias [`MaxentResult`], used
//! by every layer under `maxent`. Optimizer failures arrive as
//! [`OptError`] and are wrapped; domain failures raised inside an objective
//! travel back through the minimizer boundary as `OptError` and are
//! recovered here.
//!
//! ## Conventions
//! - **Indices are 0-based**: example positions, feature ids, label ids and
//!   flat weight coordinates (`f * num_classes + c`).
//! - Structural size mismatches are always errors, never truncation.
//! - Errors carry the first offending index/value so a failed training run
//!   can be diagnosed without re-running it.
use crate::optimization::errors::OptError;

/// Result alias for maximum-entropy operations that may produce
/// [`MaxentError`].
pub type MaxentResult<T> = Result<T, MaxentError>;

/// Unified error type for the maximum-entropy stack.
#[derive(Debug, Clone, PartialEq)]
pub enum MaxentError {
    // ---- Indices ----
    /// An unseen item was added to a locked index.
    IndexLocked { item: String },

    /// A view was requested before the dataset's indices were frozen.
    IndexNotFrozen,

    /// Lookup of an item that the index does not contain.
    UnknownItem { item: String },

    // ---- Data ----
    /// No examples where at least one is required.
    EmptyDataset,

    /// Two parallel arrays disagree in length.
    SizeMismatch { what: &'static str, expected: usize, found: usize },

    /// Example references a feature id outside `0..num_features`.
    FeatureOutOfRange { example: usize, feature: usize, num_features: usize },

    /// Example carries a label id outside `0..num_classes`.
    LabelOutOfRange { example: usize, label: usize, num_classes: usize },

    /// Real feature value is NaN/±inf.
    NonFiniteValue { example: usize, position: usize, value: f64 },

    /// Example weight must be finite and ≥ 0.
    InvalidExampleWeight { example: usize, value: f64 },

    /// Subset bounds are out of range or empty.
    InvalidSubset { start: usize, end: usize, len: usize },

    // ---- Prior ----
    /// Prior configuration is rejected at construction.
    InvalidPrior { reason: String },

    /// Vector argument has the wrong length for the operation.
    DimensionMismatch { what: &'static str, expected: usize, found: usize },

    // ---- Objective ----
    /// Weight vector reaching the objective has a non-finite entry.
    NonFiniteInput { index: usize, value: f64 },

    /// Objective value evaluated to NaN/±inf.
    NonFiniteObjective { value: f64 },

    /// Gradient entry evaluated to NaN/±inf.
    NonFiniteGradient { index: usize, value: f64 },

    // ---- Options / training ----
    /// Configuration value rejected by an option builder.
    InvalidOption { name: &'static str, value: f64, reason: &'static str },

    /// A search finished without a single usable trial.
    SearchFailed { reason: String },

    /// Wrapper for failures reported by the minimizer layer.
    Optimization(OptError),
}

impl std::error::Error for MaxentError {}

impl std::fmt::Display for MaxentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Indices ----
            MaxentError::IndexLocked { item } => {
                write!(f, "Cannot add '{item}': index is locked.")
            }
            MaxentError::IndexNotFrozen => {
                write!(f, "Indices must be frozen before a data view can be created.")
            }
            MaxentError::UnknownItem { item } => {
                write!(f, "Item '{item}' is not in the index.")
            }

            // ---- Data ----
            MaxentError::EmptyDataset => write!(f, "Dataset contains no examples."),
            MaxentError::SizeMismatch { what, expected, found } => {
                write!(f, "Size mismatch for {what}: expected {expected}, found {found}")
            }
            MaxentError::FeatureOutOfRange { example, feature, num_features } => {
                write!(
                    f,
                    "Example {example} references feature {feature}, but only {num_features} features exist."
                )
            }
            MaxentError::LabelOutOfRange { example, label, num_classes } => {
                write!(f, "Example {example} has label {label}, but only {num_classes} classes exist.")
            }
            MaxentError::NonFiniteValue { example, position, value } => {
                write!(f, "Example {example} has a non-finite value at position {position}: {value}")
            }
            MaxentError::InvalidExampleWeight { example, value } => {
                write!(f, "Example {example} has weight {value}; weights must be finite and >= 0.")
            }
            MaxentError::InvalidSubset { start, end, len } => {
                write!(f, "Invalid subset {start}..{end} of {len} examples.")
            }

            // ---- Prior ----
            MaxentError::InvalidPrior { reason } => write!(f, "Invalid prior: {reason}"),
            MaxentError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, found {found}")
            }

            // ---- Objective ----
            MaxentError::NonFiniteInput { index, value } => {
                write!(f, "Weight at index {index} is non-finite: {value}")
            }
            MaxentError::NonFiniteObjective { value } => {
                write!(f, "Objective value is non-finite: {value}")
            }
            MaxentError::NonFiniteGradient { index, value } => {
                write!(f, "Gradient at index {index} is non-finite: {value}")
            }

            // ---- Options / training ----
            MaxentError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid option {name} = {value}: {reason}")
            }
            MaxentError::SearchFailed { reason } => write!(f, "Search failed: {reason}"),
            MaxentError::Optimization(err) => write!(f, "Optimization failed: {err}"),
        }
    }
}

impl From<OptError> for MaxentError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::NonFiniteEntry { what: "theta", index, value } => {
                MaxentError::NonFiniteInput { index, value }
            }
            OptError::NonFiniteEntry { what: "gradient", index, value } => {
                MaxentError::NonFiniteGradient { index, value }
            }
            OptError::NonFiniteCost { value } => MaxentError::NonFiniteObjective { value },
            other => MaxentError::Optimization(other),
        }
    }
}

impl From<MaxentError> for OptError {
    fn from(err: MaxentError) -> Self {
        match err {
            MaxentError::NonFiniteInput { index, value } => {
                OptError::NonFiniteEntry { what: "theta", index, value }
            }
            MaxentError::NonFiniteObjective { value } => OptError::NonFiniteCost { value },
            MaxentError::NonFiniteGradient { index, value } => {
                OptError::NonFiniteEntry { what: "gradient", index, value }
            }
            MaxentError::DimensionMismatch { what, expected, found } => {
                OptError::DimensionMismatch { what, expected, found }
            }
            MaxentError::Optimization(inner) => inner,
            other => OptError::Objective { text: other.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Ensure numerical objective failures survive a trip through the
    // minimizer boundary with their diagnostics intact.
    //
    // Given
    // -----
    // - `NonFiniteInput { index: 3, value: +inf }`.
    //
    // Expect
    // ------
    // - Converting to `OptError` and back yields the original error.
    fn non_finite_input_round_trips_through_opt_error() {
        // Arrange
        let original = MaxentError::NonFiniteInput { index: 3, value: f64::INFINITY };

        // Act
        let opt: OptError = original.clone().into();
        let back: MaxentError = opt.into();

        // Assert
        assert_eq!(back, original);
    }

    #[test]
    // Purpose
    // -------
    // Verify that domain errors without an optimizer counterpart are
    // rendered into `OptError::Objective`, and unrelated optimizer errors
    // are wrapped.
    //
    // Given
    // -----
    // - `EmptyDataset` and `OptError::MissingThetaHat`.
    //
    // Expect
    // ------
    // - `Objective { text }` mentioning the dataset; `Optimization(..)`.
    fn conversions_wrap_and_render_remaining_variants() {
        let opt: OptError = MaxentError::EmptyDataset.into();
        match opt {
            OptError::Objective { text } => assert!(text.contains("no examples")),
            other => panic!("unexpected variant: {other:?}"),
        }
        let wrapped: MaxentError = OptError::MissingThetaHat.into();
        assert_eq!(wrapped, MaxentError::Optimization(OptError::MissingThetaHat));
    }
}
