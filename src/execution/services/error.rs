//! Execution service errors.

use crate::agent_registry::{domain::AgentId, services::RegistryServiceError};
use crate::capability::{CapabilityType, ParameterError};
use crate::discovery::domain::DiscoveryError;
use crate::execution::{
    domain::{ChainExecution, ExecutionDomainError, ExecutionId, ExecutionResult, ExecutionStatus},
    ports::ExecutionResultRepositoryError,
};
use thiserror::Error;

/// Errors returned by the execution engine.
///
/// Variants raised after a result was stored carry that result, so callers
/// see both the structured outcome and the error.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The request failed validation before any attempt.
    #[error("invalid execution request: {0}")]
    InvalidRequest(String),

    /// The target agent is not registered.
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    /// The target agent does not advertise the requested capability.
    #[error("agent {agent_id} does not offer {capability_type}")]
    CapabilityNotOffered {
        /// Target agent.
        agent_id: AgentId,
        /// Requested capability.
        capability_type: CapabilityType,
    },

    /// Parameters did not match the capability schema.
    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),

    /// No agent could be discovered for the request.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The registry could not be read or updated.
    #[error(transparent)]
    Registry(#[from] RegistryServiceError),

    /// No result exists with the given id.
    #[error("execution result {0} not found")]
    ResultNotFound(ExecutionId),

    /// The execution has already left the queue.
    #[error("execution {execution_id} is {status} and can no longer be canceled")]
    NotCancellable {
        /// Execution identifier.
        execution_id: ExecutionId,
        /// Current status.
        status: ExecutionStatus,
    },

    /// The asynchronous queue was full; the stored result is failed.
    #[error("execution queue full")]
    QueueFull {
        /// The failed result.
        result: Box<ExecutionResult>,
    },

    /// The execution ended without completing.
    #[error("execution {} ended {}: {}", .result.id(), .result.status(), .result.error().unwrap_or("no error recorded"))]
    Terminated {
        /// The terminal result.
        result: Box<ExecutionResult>,
    },

    /// A chain step failed; later steps were not run.
    #[error("chain step {step} failed: {source}")]
    ChainFailed {
        /// Index of the failing step.
        step: usize,
        /// The chain, marked failed.
        chain: Box<ChainExecution>,
        /// The step failure.
        #[source]
        source: Box<ExecutionError>,
    },

    /// Result storage failed on a path that reports persistence errors.
    #[error(transparent)]
    Repository(#[from] ExecutionResultRepositoryError),

    /// A status transition was rejected.
    #[error(transparent)]
    Domain(#[from] ExecutionDomainError),

    /// Engine state lock was poisoned.
    #[error("engine state unavailable: {0}")]
    State(String),
}

impl ExecutionError {
    /// Returns the stored result carried by the error, if any.
    #[must_use]
    pub fn result(&self) -> Option<&ExecutionResult> {
        match self {
            Self::QueueFull { result } | Self::Terminated { result } => Some(&**result),
            Self::ChainFailed { source, .. } => source.result(),
            _ => None,
        }
    }

    /// Returns the failed chain carried by the error, if any.
    #[must_use]
    pub fn chain(&self) -> Option<&ChainExecution> {
        match self {
            Self::ChainFailed { chain, .. } => Some(&**chain),
            _ => None,
        }
    }
}

/// Result type for execution engine operations.
pub type ExecutionServiceResult<T> = Result<T, ExecutionError>;
