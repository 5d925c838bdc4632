//! In-memory execution result repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::execution::{
    domain::{ExecutionId, ExecutionResult, ExecutionStatus},
    ports::{
        ExecutionResultRepository, ExecutionResultRepositoryError,
        ExecutionResultRepositoryResult,
    },
};

/// Thread-safe in-memory execution result repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutionResultRepository {
    state: Arc<RwLock<HashMap<ExecutionId, ExecutionResult>>>,
}

impl InMemoryExecutionResultRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored results.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn len(&self) -> ExecutionResultRepositoryResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns whether no results are stored.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn is_empty(&self) -> ExecutionResultRepositoryResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(
        &self,
    ) -> ExecutionResultRepositoryResult<
        std::sync::RwLockReadGuard<'_, HashMap<ExecutionId, ExecutionResult>>,
    > {
        self.state.read().map_err(|err| {
            ExecutionResultRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn newest_first(
        &self,
        limit: usize,
        keep: impl Fn(&ExecutionResult) -> bool,
    ) -> ExecutionResultRepositoryResult<Vec<ExecutionResult>> {
        let state = self.read()?;
        let mut results: Vec<ExecutionResult> =
            state.values().filter(|result| keep(result)).cloned().collect();
        results.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        results.truncate(limit);
        Ok(results)
    }
}

#[async_trait]
impl ExecutionResultRepository for InMemoryExecutionResultRepository {
    async fn save(&self, result: &ExecutionResult) -> ExecutionResultRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ExecutionResultRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(result.id(), result.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ExecutionId,
    ) -> ExecutionResultRepositoryResult<Option<ExecutionResult>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn list_recent(
        &self,
        limit: usize,
    ) -> ExecutionResultRepositoryResult<Vec<ExecutionResult>> {
        self.newest_first(limit, |_| true)
    }

    async fn list_by_status(
        &self,
        status: ExecutionStatus,
        limit: usize,
    ) -> ExecutionResultRepositoryResult<Vec<ExecutionResult>> {
        self.newest_first(limit, |result| result.status() == status)
    }
}
