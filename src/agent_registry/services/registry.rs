//! Service layer for agent registration, lookup and call statistics.
//!
//! [`AgentRegistry`] is the authoritative in-memory directory of agents.
//! Reads take a shared lock; mutations take an exclusive lock only for the
//! in-memory change and release it before writing through to the
//! [`AgentRepository`].

use crate::agent_registry::{
    domain::{Agent, AgentDomainError, AgentId, AgentKind, AgentProfile, AgentStatus},
    ports::{AgentRepository, AgentRepositoryError},
    services::builtin,
};
use crate::capability::{Capability, CapabilityType};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};
use thiserror::Error;

/// Request payload for registering or re-registering an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterAgentRequest {
    id: String,
    kind: AgentKind,
    name: Option<String>,
    description: String,
    capabilities: Vec<Capability>,
    endpoint: Option<String>,
    status: Option<AgentStatus>,
    trust_score: Option<f64>,
}

impl RegisterAgentRequest {
    /// Creates a request with the required identity fields.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: AgentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            description: String::new(),
            capabilities: Vec::new(),
            endpoint: None,
            status: None,
            trust_score: None,
        }
    }

    /// Sets the human-readable name; defaults to the id.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a capability.
    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Appends several capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the requested status.
    #[must_use]
    pub const fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the requested trust score.
    #[must_use]
    pub const fn with_trust_score(mut self, score: f64) -> Self {
        self.trust_score = Some(score);
        self
    }

    /// Returns the raw requested id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn into_parts(self) -> Result<(AgentId, AgentProfile), AgentDomainError> {
        let id = AgentId::new(self.id)?;
        let name = self.name.unwrap_or_else(|| id.as_str().to_owned());
        let profile = AgentProfile {
            name,
            description: self.description,
            kind: self.kind,
            capabilities: self.capabilities,
            endpoint: self.endpoint,
            status: self.status,
            trust_score: self.trust_score,
        };
        Ok((id, profile))
    }
}

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum RegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),
    /// No agent exists with the given identifier.
    #[error("agent {0} not found")]
    NotFound(AgentId),
    /// Repository operation failed after the in-memory state was updated.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
    /// The in-memory state lock was poisoned by a panicking writer.
    #[error("registry state unavailable: {0}")]
    State(String),
}

/// Result type for registry service operations.
pub type RegistryResult<T> = Result<T, RegistryServiceError>;

/// Thread-safe directory of registered agents.
pub struct AgentRegistry<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    agents: RwLock<HashMap<AgentId, Agent>>,
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> AgentRegistry<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    /// Creates an empty registry backed by `repository`.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            agents: RwLock::new(HashMap::new()),
            repository,
            clock,
        }
    }

    fn read_state(&self) -> RegistryResult<RwLockReadGuard<'_, HashMap<AgentId, Agent>>> {
        self.agents
            .read()
            .map_err(|err| RegistryServiceError::State(err.to_string()))
    }

    /// Applies `change` to the agent under an exclusive lock and returns a
    /// snapshot of the updated record.
    fn mutate<T>(
        &self,
        id: &AgentId,
        change: impl FnOnce(&mut Agent, &C) -> T,
    ) -> RegistryResult<(Agent, T)> {
        let mut agents = self
            .agents
            .write()
            .map_err(|err| RegistryServiceError::State(err.to_string()))?;
        let agent = agents
            .get_mut(id)
            .ok_or_else(|| RegistryServiceError::NotFound(id.clone()))?;
        let outcome = change(agent, &self.clock);
        Ok((agent.clone(), outcome))
    }

    async fn persist_best_effort(&self, agent: &Agent) {
        if let Err(err) = self.repository.save(agent).await {
            tracing::warn!(agent_id = %agent.id(), error = %err, "failed to persist agent");
        }
    }

    fn sorted(mut agents: Vec<Agent>) -> Vec<Agent> {
        agents.sort_by(|a, b| a.id().cmp(b.id()));
        agents
    }

    fn collect_where(&self, predicate: impl Fn(&Agent) -> bool) -> RegistryResult<Vec<Agent>> {
        let agents = self.read_state()?;
        let matching = agents
            .values()
            .filter(|agent| predicate(agent))
            .cloned()
            .collect();
        Ok(Self::sorted(matching))
    }

    /// Registers an agent, merging with any existing record of the same id.
    ///
    /// Re-registration replaces descriptive fields but preserves the
    /// registration time and call statistics. The in-memory state is updated
    /// before the repository write, so a persistence error leaves the agent
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Domain`] when the id is empty, or
    /// [`RegistryServiceError::Repository`] when the write-through fails.
    pub async fn register(&self, request: RegisterAgentRequest) -> RegistryResult<Agent> {
        let (id, profile) = request.into_parts()?;

        let (agent, merged) = {
            let mut agents = self
                .agents
                .write()
                .map_err(|err| RegistryServiceError::State(err.to_string()))?;
            let merged = if let Some(existing) = agents.get_mut(&id) {
                existing.reregister(profile, &*self.clock);
                true
            } else {
                agents.insert(id.clone(), Agent::new(id.clone(), profile, &*self.clock));
                false
            };
            let snapshot = agents
                .get(&id)
                .cloned()
                .ok_or_else(|| RegistryServiceError::NotFound(id.clone()))?;
            (snapshot, merged)
        };

        tracing::info!(
            agent_id = %agent.id(),
            kind = %agent.kind(),
            capabilities = agent.capabilities().len(),
            merged,
            "agent registered"
        );

        self.repository.save(&agent).await?;
        Ok(agent)
    }

    /// Removes an agent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::NotFound`] when the agent is absent,
    /// or [`RegistryServiceError::Repository`] when the storage delete fails.
    pub async fn unregister(&self, id: &AgentId) -> RegistryResult<Agent> {
        let removed = {
            let mut agents = self
                .agents
                .write()
                .map_err(|err| RegistryServiceError::State(err.to_string()))?;
            agents
                .remove(id)
                .ok_or_else(|| RegistryServiceError::NotFound(id.clone()))?
        };
        tracing::info!(agent_id = %id, "agent unregistered");
        self.repository.delete(id).await?;
        Ok(removed)
    }

    /// Returns the agent with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::NotFound`] when the agent is absent.
    pub fn get(&self, id: &AgentId) -> RegistryResult<Agent> {
        self.find(id)?
            .ok_or_else(|| RegistryServiceError::NotFound(id.clone()))
    }

    /// Returns the agent with the given id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::State`] when the state lock is
    /// poisoned.
    pub fn find(&self, id: &AgentId) -> RegistryResult<Option<Agent>> {
        Ok(self.read_state()?.get(id).cloned())
    }

    /// Returns every registered agent, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::State`] when the state lock is
    /// poisoned.
    pub fn get_all(&self) -> RegistryResult<Vec<Agent>> {
        self.collect_where(|_| true)
    }

    /// Returns agents of the given kind, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::State`] when the state lock is
    /// poisoned.
    pub fn get_by_kind(&self, kind: AgentKind) -> RegistryResult<Vec<Agent>> {
        self.collect_where(|agent| agent.kind() == kind)
    }

    /// Returns agents offering the capability, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::State`] when the state lock is
    /// poisoned.
    pub fn get_by_capability(
        &self,
        capability_type: &CapabilityType,
    ) -> RegistryResult<Vec<Agent>> {
        self.collect_where(|agent| agent.has_capability(capability_type))
    }

    /// Returns active agents, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::State`] when the state lock is
    /// poisoned.
    pub fn get_active(&self) -> RegistryResult<Vec<Agent>> {
        self.collect_where(Agent::is_active)
    }

    /// Returns the number of registered agents.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::State`] when the state lock is
    /// poisoned.
    pub fn len(&self) -> RegistryResult<usize> {
        Ok(self.read_state()?.len())
    }

    /// Returns whether no agents are registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::State`] when the state lock is
    /// poisoned.
    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.read_state()?.is_empty())
    }

    /// Changes an agent's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::NotFound`] when the agent is absent,
    /// or [`RegistryServiceError::Repository`] when the write-through fails.
    pub async fn update_status(&self, id: &AgentId, status: AgentStatus) -> RegistryResult<Agent> {
        let (agent, ()) = self.mutate(id, |agent, clock| agent.set_status(status, clock))?;
        tracing::info!(agent_id = %id, %status, "agent status updated");
        self.repository.save(&agent).await?;
        Ok(agent)
    }

    /// Records the outcome and latency of one call against an agent.
    ///
    /// Persistence is best-effort; failures are logged.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::NotFound`] when the agent is absent.
    pub async fn record_call(
        &self,
        id: &AgentId,
        success: bool,
        latency_ms: f64,
    ) -> RegistryResult<Agent> {
        let (agent, ()) = self.mutate(id, |agent, _| agent.record_call(success, latency_ms))?;
        tracing::debug!(
            agent_id = %id,
            success,
            latency_ms,
            reliability = agent.reliability(),
            total_calls = agent.total_calls(),
            "agent call recorded"
        );
        self.persist_best_effort(&agent).await;
        Ok(agent)
    }

    /// Replaces an agent's trust score, clamped to `[0, 1]`.
    ///
    /// Persistence is best-effort; failures are logged.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::NotFound`] when the agent is absent.
    pub async fn update_trust_score(&self, id: &AgentId, score: f64) -> RegistryResult<Agent> {
        let (agent, ()) = self.mutate(id, |agent, _| agent.set_trust_score(score))?;
        self.persist_best_effort(&agent).await;
        Ok(agent)
    }

    /// Reports whether the agent is active and stamps the health-check time.
    ///
    /// This is a liveness proxy on recorded status; probing the agent itself
    /// is a handler concern.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::NotFound`] when the agent is absent.
    pub async fn health_check(&self, id: &AgentId) -> RegistryResult<bool> {
        let (agent, healthy) = self.mutate(id, |agent, clock| agent.mark_health_checked(clock))?;
        self.persist_best_effort(&agent).await;
        Ok(healthy)
    }

    /// Rehydrates the registry from the repository.
    ///
    /// Stored records replace in-memory entries with the same id. Returns the
    /// number of records loaded.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Repository`] when the repository
    /// cannot be read.
    pub async fn load(&self) -> RegistryResult<usize> {
        let stored = self.repository.list_all().await?;
        let count = stored.len();
        {
            let mut agents = self
                .agents
                .write()
                .map_err(|err| RegistryServiceError::State(err.to_string()))?;
            for agent in stored {
                agents.insert(agent.id().clone(), agent);
            }
        }
        tracing::info!(count, "agents loaded from storage");
        Ok(count)
    }

    /// Registers the fixed set of first-party agents.
    ///
    /// # Errors
    ///
    /// Returns the first registration error encountered.
    pub async fn register_builtin_agents(&self) -> RegistryResult<Vec<Agent>> {
        let mut registered = Vec::new();
        for request in builtin::builtin_agents() {
            registered.push(self.register(request).await?);
        }
        Ok(registered)
    }
}
