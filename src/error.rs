//! Error types shared by the board model, encoder, gateway and decoder

use thiserror::Error;

/// Failures raised by the core tour pipeline.
///
/// Unsatisfiability is not an error; it is reported through
/// [`crate::tour::TourOutcome::Unsatisfiable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// A configuration value is out of range. Raised before any constraint is built.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    /// The solver returned a value the decoder cannot interpret.
    /// The encoder and the gateway disagree on the constraint semantics.
    #[error("invalid assignment at cell {cell}: {reason}")]
    InvalidAssignment { cell: usize, reason: String },

    /// The backend failed, was interrupted or ran out of time.
    #[error("solver failure: {0}")]
    SolverFailure(String),
}

impl TourError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        TourError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn assignment(cell: usize, reason: impl Into<String>) -> Self {
        TourError::InvalidAssignment {
            cell,
            reason: reason.into(),
        }
    }
}
