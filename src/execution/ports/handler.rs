//! Handler port: the extension point for agent back-ends.

use crate::agent_registry::domain::Agent;
use crate::capability::ParameterValue;
use crate::execution::domain::ExecutionRequest;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Runs requests against one kind of agent.
///
/// The engine holds one handler per agent kind and falls back to the
/// built-in handler for kinds with none registered.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentHandler: Send + Sync {
    /// Executes `request` against `agent` and returns its output payload.
    async fn execute(
        &self,
        agent: &Agent,
        request: &ExecutionRequest,
    ) -> HandlerResult<ParameterValue>;

    /// Probes whether `agent` can serve requests.
    async fn health_check(&self, agent: &Agent) -> HandlerResult<bool>;
}

/// Errors returned by handler implementations.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// The agent rejected or failed the request.
    #[error("agent reported failure: {0}")]
    Failed(String),

    /// The agent could not be reached.
    #[error("agent unreachable: {0}")]
    Unreachable(String),

    /// Handler runtime failure.
    #[error("handler runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Wraps a runtime error from the handler.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
