//! In-memory agent repository for tests and ephemeral hosts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent_registry::{
    domain::{Agent, AgentId},
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};

/// Thread-safe in-memory agent repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRepository {
    state: Arc<RwLock<HashMap<AgentId, Agent>>>,
}

impl InMemoryAgentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `agents`.
    #[must_use]
    pub fn with_agents(agents: impl IntoIterator<Item = Agent>) -> Self {
        let records = agents
            .into_iter()
            .map(|agent| (agent.id().clone(), agent))
            .collect();
        Self {
            state: Arc::new(RwLock::new(records)),
        }
    }

    /// Returns a stored record without going through the port.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn stored(&self, id: &AgentId) -> AgentRepositoryResult<Option<Agent>> {
        let state = self.state.read().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(id).cloned())
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn save(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(agent.id().clone(), agent.clone());
        Ok(())
    }

    async fn delete(&self, id: &AgentId) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AgentRepositoryError::NotFound(id.clone()))
    }

    async fn list_all(&self) -> AgentRepositoryResult<Vec<Agent>> {
        let state = self.state.read().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.values().cloned().collect())
    }
}
