//! Error types for execution domain validation and parsing.

use super::ExecutionStatus;
use thiserror::Error;

/// Errors returned while constructing or transitioning execution values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionDomainError {
    /// Priority outside `1..=5`.
    #[error("invalid priority {0}, expected 1 to 5")]
    InvalidPriority(u8),

    /// The requested status change would regress or leave a terminal state.
    #[error("invalid execution transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ExecutionStatus,
        /// Requested status.
        to: ExecutionStatus,
    },
}

/// Error returned while parsing an execution status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown execution status: {0}")]
pub struct ParseExecutionStatusError(pub String);
