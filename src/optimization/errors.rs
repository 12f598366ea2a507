//! Errors raised by the minimizer layer.
//!
//! [`OptError`] covers option validation, malformed vectors crossing the
//! objective boundary, and failures reported by the argmin backend. Errors
//! raised by an objective travel through argmin boxed inside
//! `argmin::core::Error` and are recovered intact by
//! `From<argmin::core::Error>`.
use argmin::core::{ArgminError, Error};
use std::fmt;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

/// Failure category reported by the argmin backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverFailure {
    InvalidParameter,
    NotImplemented,
    NotInitialized,
    /// Includes line searches that cannot find a descent step.
    ConditionViolated,
    CheckpointNotFound,
    PotentialBug,
    ImpossibleError,
    /// Anything argmin does not classify.
    Backend,
}

impl SolverFailure {
    fn label(self) -> &'static str {
        match self {
            SolverFailure::InvalidParameter => "invalid parameter",
            SolverFailure::NotImplemented => "not implemented",
            SolverFailure::NotInitialized => "not initialized",
            SolverFailure::ConditionViolated => "condition violated",
            SolverFailure::CheckpointNotFound => "checkpoint not found",
            SolverFailure::PotentialBug => "potential bug",
            SolverFailure::ImpossibleError => "impossible error",
            SolverFailure::Backend => "backend error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Options ----
    /// A tolerance (`tol_grad`, `tol_cost`, or the relative `tol` of a
    /// minimizer run) must be finite and > 0.
    InvalidTolerance { name: &'static str, value: f64 },

    /// `max_iter` must be > 0.
    InvalidMaxIter { max_iter: usize },

    /// At least one of `tol_grad`, `tol_cost`, `max_iter` is required.
    NoTolerancesProvided,

    /// Unknown line-search name.
    InvalidLineSearch { name: String },

    /// L-BFGS history must hold at least one pair.
    InvalidLBFGSMem { mem: usize },

    /// L1 coefficient must be finite and > 0.
    InvalidL1Coefficient { value: f64 },

    // ---- Vectors and values ----
    /// A vector (`theta`, `gradient`, `direction`) has the wrong length.
    DimensionMismatch { what: &'static str, expected: usize, found: usize },

    /// First NaN/±inf entry of a vector (`theta`, `gradient`, `theta_hat`).
    NonFiniteEntry { what: &'static str, index: usize, value: f64 },

    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// The solver finished without a best parameter vector.
    MissingThetaHat,

    /// Domain-level failure raised by an objective (rendered message).
    Objective { text: String },

    // ---- Backend ----
    /// Failure reported by argmin.
    Solver { kind: SolverFailure, text: String },
}

impl OptError {
    /// Backend failure with the given category.
    pub fn solver(kind: SolverFailure, text: impl Into<String>) -> Self {
        OptError::Solver { kind, text: text.into() }
    }
}

impl std::error::Error for OptError {}

impl fmt::Display for OptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptError::InvalidTolerance { name, value } => {
                write!(f, "Invalid tolerance {name} = {value}: must be finite and > 0")
            }
            OptError::InvalidMaxIter { max_iter } => {
                write!(f, "Invalid maximum iterations {max_iter}: must be > 0")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided: set tol_grad, tol_cost or max_iter")
            }
            OptError::InvalidLineSearch { name } => write!(
                f,
                "Invalid line searcher '{name}': expected 'MoreThuente' or 'HagerZhang' (any case)"
            ),
            OptError::InvalidLBFGSMem { mem } => {
                write!(f, "Invalid L-BFGS memory {mem}: must be > 0")
            }
            OptError::InvalidL1Coefficient { value } => {
                write!(f, "Invalid L1 coefficient {value}: must be finite and > 0")
            }
            OptError::DimensionMismatch { what, expected, found } => {
                write!(f, "{what} dimension mismatch: expected {expected}, found {found}")
            }
            OptError::NonFiniteEntry { what, index, value } => {
                write!(f, "Non-finite {what} entry at index {index}: {value}")
            }
            OptError::NonFiniteCost { value } => write!(f, "Non-finite cost value: {value}"),
            OptError::MissingThetaHat => write!(f, "Solver returned no parameter estimate"),
            OptError::Objective { text } => write!(f, "Objective evaluation failed: {text}"),
            OptError::Solver { kind, text } => write!(f, "Solver {}: {text}", kind.label()),
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        let err = match err.downcast::<OptError>() {
            Ok(ours) => return ours,
            Err(err) => err,
        };
        let text = err.to_string();
        let kind = match err.downcast_ref::<ArgminError>() {
            Some(ArgminError::InvalidParameter { .. }) => SolverFailure::InvalidParameter,
            Some(ArgminError::NotImplemented { .. }) => SolverFailure::NotImplemented,
            Some(ArgminError::NotInitialized { .. }) => SolverFailure::NotInitialized,
            Some(ArgminError::ConditionViolated { .. }) => SolverFailure::ConditionViolated,
            Some(ArgminError::CheckpointNotFound { .. }) => SolverFailure::CheckpointNotFound,
            Some(ArgminError::PotentialBug { .. }) => SolverFailure::PotentialBug,
            Some(ArgminError::ImpossibleError { .. }) => SolverFailure::ImpossibleError,
            _ => SolverFailure::Backend,
        };
        OptError::Solver { kind, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // An `OptError` boxed into `argmin::core::Error` comes back unchanged.
    //
    // Given
    // -----
    // - `NonFiniteEntry { what: "gradient", index: 2, value: +inf }`.
    //
    // Expect
    // ------
    // - The same variant and payload after the round trip.
    fn objective_errors_survive_argmin() {
        // Arrange
        let original = OptError::NonFiniteEntry { what: "gradient", index: 2, value: f64::INFINITY };
        let wrapped: Error = original.clone().into();

        // Act
        let recovered = OptError::from(wrapped);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // argmin's own error kinds are classified.
    //
    // Given
    // -----
    // - `ArgminError::ConditionViolated` and a plain anyhow-style message.
    //
    // Expect
    // ------
    // - `Solver { kind: ConditionViolated }` keeping the text, and
    //   `Solver { kind: Backend }`.
    fn argmin_errors_are_classified() {
        // Arrange
        let violated = Error::new(ArgminError::ConditionViolated {
            text: "not a descent direction".to_string(),
        });
        let other = Error::msg("line search exhausted");

        // Act
        let violated = OptError::from(violated);
        let other = OptError::from(other);

        // Assert
        match violated {
            OptError::Solver { kind: SolverFailure::ConditionViolated, text } => {
                assert!(text.contains("descent direction"));
            }
            unexpected => panic!("unexpected variant: {unexpected:?}"),
        }
        assert!(matches!(other, OptError::Solver { kind: SolverFailure::Backend, .. }));
    }
}
