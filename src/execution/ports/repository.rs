//! Repository port for execution result persistence.

use crate::execution::domain::{ExecutionId, ExecutionResult, ExecutionStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for execution result repository operations.
pub type ExecutionResultRepositoryResult<T> = Result<T, ExecutionResultRepositoryError>;

/// Durable storage for execution results, keyed by execution id.
#[async_trait]
pub trait ExecutionResultRepository: Send + Sync {
    /// Inserts or overwrites a result.
    async fn save(&self, result: &ExecutionResult) -> ExecutionResultRepositoryResult<()>;

    /// Finds a result by id.
    async fn find_by_id(
        &self,
        id: ExecutionId,
    ) -> ExecutionResultRepositoryResult<Option<ExecutionResult>>;

    /// Returns up to `limit` results, newest first.
    async fn list_recent(
        &self,
        limit: usize,
    ) -> ExecutionResultRepositoryResult<Vec<ExecutionResult>>;

    /// Returns up to `limit` results with `status`, newest first.
    async fn list_by_status(
        &self,
        status: ExecutionStatus,
        limit: usize,
    ) -> ExecutionResultRepositoryResult<Vec<ExecutionResult>>;
}

/// Errors returned by execution result repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ExecutionResultRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ExecutionResultRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
