//! Error types for agent domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent identifier is empty after trimming.
    #[error("agent id must not be empty")]
    EmptyAgentId,
}

/// Error returned while parsing an agent status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);

/// Error returned while parsing an agent kind from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent kind: {0}")]
pub struct ParseAgentKindError(pub String);
