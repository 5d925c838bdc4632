//! Repository port for agent persistence.

use crate::agent_registry::domain::{Agent, AgentId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent repository operations.
pub type AgentRepositoryResult<T> = Result<T, AgentRepositoryError>;

/// Durable storage for agent records, keyed by agent id.
///
/// The registry treats this as a write-through target and a refill source
/// at startup; it never reads from storage on the hot path.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Inserts or overwrites the full agent record.
    async fn save(&self, agent: &Agent) -> AgentRepositoryResult<()>;

    /// Deletes the agent record.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when no record exists.
    async fn delete(&self, id: &AgentId) -> AgentRepositoryResult<()>;

    /// Returns every stored agent record.
    async fn list_all(&self) -> AgentRepositoryResult<Vec<Agent>>;
}

/// Errors returned by agent repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRepositoryError {
    /// The agent record was not found.
    #[error("stored agent not found: {0}")]
    NotFound(AgentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
