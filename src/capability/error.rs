//! Error types for capability identifiers and parameter validation.

use super::ParameterKind;
use thiserror::Error;

/// Errors returned while constructing capability values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// The capability type is empty after trimming.
    #[error("capability type must not be empty")]
    EmptyCapabilityType,

    /// The capability type contains whitespace.
    #[error("capability type '{0}' must not contain whitespace")]
    InvalidCapabilityType(String),
}

/// Errors returned when parameters do not satisfy a capability's schema.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParameterError {
    /// A required parameter was not supplied and has no default.
    #[error("missing required parameter '{parameter}'")]
    Missing {
        /// Parameter name.
        parameter: String,
    },

    /// The supplied value has the wrong kind.
    #[error("parameter '{parameter}' expects {expected}, got {actual}")]
    WrongKind {
        /// Parameter name.
        parameter: String,
        /// Kind declared by the parameter spec.
        expected: ParameterKind,
        /// Kind of the supplied value.
        actual: ParameterKind,
    },

    /// The supplied value is not one of the allowed values.
    #[error("parameter '{parameter}' does not allow value {value}")]
    NotAllowed {
        /// Parameter name.
        parameter: String,
        /// Rendered rejected value.
        value: String,
    },

    /// The supplied numeric value is outside the declared range.
    #[error("parameter '{parameter}' value {value} is outside the permitted range")]
    OutOfRange {
        /// Parameter name.
        parameter: String,
        /// Rejected value.
        value: f64,
    },
}
