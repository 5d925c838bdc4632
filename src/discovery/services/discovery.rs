//! Discovery service: resolves capability requests to ranked agents.

use crate::agent_registry::{
    domain::{Agent, AgentId},
    ports::AgentRepository,
    services::AgentRegistry,
};
use crate::capability::{CapabilityType, catalog};
use crate::discovery::domain::{
    CapabilityIndex, CapabilityMatch, CapabilityRequest, DiscoveryConfig, DiscoveryError,
    DiscoveryResult, IndexSnapshot, Intent, Preferences, RELEVANCE_FLOOR, RequestTarget, scoring,
};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Resolves capability requests and free-text intents to ranked agents.
///
/// Holds a TTL-bounded [`CapabilityIndex`] over the registry's active
/// agents. Queries take the index's shared lock; a stale index is rebuilt
/// under the exclusive lock before the query proceeds.
pub struct DiscoveryService<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    registry: Arc<AgentRegistry<R, C>>,
    index: RwLock<CapabilityIndex>,
    config: DiscoveryConfig,
}

impl<R, C> DiscoveryService<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a discovery service over `registry`.
    #[must_use]
    pub fn new(registry: Arc<AgentRegistry<R, C>>, config: DiscoveryConfig) -> Self {
        Self {
            registry,
            index: RwLock::new(CapabilityIndex::default()),
            config,
        }
    }

    /// Returns the service configuration.
    #[must_use]
    pub const fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Returns the underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<AgentRegistry<R, C>> {
        &self.registry
    }

    /// Returns ranked matches for `request`.
    ///
    /// An empty result is not an error; use [`Self::discover_best`] when a
    /// match is required.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::EmptyRequest`] for a blank intent, or a
    /// registry or index error when shared state cannot be read.
    pub fn discover(&self, request: &CapabilityRequest) -> DiscoveryResult<Vec<CapabilityMatch>> {
        let preferences = request.preferences();
        let matches = match request.target() {
            RequestTarget::Capability(capability_type) => {
                self.match_type(capability_type, preferences)?
            }
            RequestTarget::Intent(raw) => {
                let intent = Intent::parse(raw);
                if intent.text().is_empty() {
                    return Err(DiscoveryError::EmptyRequest);
                }
                self.match_intent(&intent, preferences)?
            }
        };
        let ranked = self.rank(matches, request);
        tracing::debug!(
            request = %request.key(),
            matches = ranked.len(),
            "discovery resolved"
        );
        Ok(ranked)
    }

    /// Returns the top match for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NoMatch`] when nothing matches, or any
    /// error from [`Self::discover`].
    pub fn discover_best(&self, request: &CapabilityRequest) -> DiscoveryResult<CapabilityMatch> {
        self.discover(request)?
            .into_iter()
            .next()
            .ok_or_else(|| DiscoveryError::NoMatch(request.key()))
    }

    /// Resolves a batch of requests, keyed by capability type or intent.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::BatchFailed`] naming the first request that
    /// failed; no partial results are returned.
    pub fn discover_multiple(
        &self,
        requests: &[CapabilityRequest],
    ) -> DiscoveryResult<BTreeMap<String, Vec<CapabilityMatch>>> {
        let mut results = BTreeMap::new();
        for (index, request) in requests.iter().enumerate() {
            let matches = self
                .discover(request)
                .map_err(|source| DiscoveryError::BatchFailed {
                    index,
                    source: Box::new(source),
                })?;
            results.insert(request.key(), matches);
        }
        Ok(results)
    }

    /// Rebuilds the capability index regardless of its age.
    ///
    /// # Errors
    ///
    /// Returns a registry or index error when shared state cannot be read.
    pub fn refresh_index(&self) -> DiscoveryResult<IndexSnapshot> {
        let active = self.registry.get_active()?;
        let now = Instant::now();
        let rebuilt = CapabilityIndex::build(&active, now);
        let snapshot = rebuilt.snapshot(now);
        *self.write_index()? = rebuilt;
        tracing::debug!(
            capabilities = snapshot.capability_count(),
            "capability index refreshed"
        );
        Ok(snapshot)
    }

    /// Summarises the current index without rebuilding it.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::IndexUnavailable`] when the lock is
    /// poisoned.
    pub fn index_snapshot(&self) -> DiscoveryResult<IndexSnapshot> {
        let index = self
            .index
            .read()
            .map_err(|err| DiscoveryError::IndexUnavailable(err.to_string()))?;
        Ok(index.snapshot(Instant::now()))
    }

    fn write_index(&self) -> DiscoveryResult<std::sync::RwLockWriteGuard<'_, CapabilityIndex>> {
        self.index
            .write()
            .map_err(|err| DiscoveryError::IndexUnavailable(err.to_string()))
    }

    fn rebuild_if_stale(&self) -> DiscoveryResult<()> {
        let active = self.registry.get_active()?;
        let mut index = self.write_index()?;
        let now = Instant::now();
        if index.is_stale(self.config.index_ttl, now) {
            *index = CapabilityIndex::build(&active, now);
            tracing::debug!(agents = active.len(), "capability index rebuilt");
        }
        Ok(())
    }

    fn indexed_agents(&self, capability_type: &CapabilityType) -> DiscoveryResult<Vec<AgentId>> {
        {
            let index = self
                .index
                .read()
                .map_err(|err| DiscoveryError::IndexUnavailable(err.to_string()))?;
            if !index.is_stale(self.config.index_ttl, Instant::now()) {
                return Ok(index.agents_for(capability_type).to_vec());
            }
        }
        self.rebuild_if_stale()?;
        let index = self
            .index
            .read()
            .map_err(|err| DiscoveryError::IndexUnavailable(err.to_string()))?;
        Ok(index.agents_for(capability_type).to_vec())
    }

    fn candidates_for(&self, capability_type: &CapabilityType) -> DiscoveryResult<Vec<Agent>> {
        let ids = self.indexed_agents(capability_type)?;
        if ids.is_empty() {
            let live = self.registry.get_by_capability(capability_type)?;
            return Ok(live.into_iter().filter(Agent::is_active).collect());
        }
        let mut agents = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(agent) = self.registry.find(id)?
                && agent.is_active()
            {
                agents.push(agent);
            }
        }
        Ok(agents)
    }

    fn match_type(
        &self,
        capability_type: &CapabilityType,
        preferences: &Preferences,
    ) -> DiscoveryResult<Vec<CapabilityMatch>> {
        let name = catalog::display_name(capability_type);
        let matches = self
            .candidates_for(capability_type)?
            .into_iter()
            .filter_map(|agent| {
                let capability = agent.capability(capability_type)?.clone();
                let score = scoring::score(&agent, preferences, &self.config);
                let confidence = scoring::confidence(&agent);
                let reasoning = format!(
                    "{} offers {name} (trust {:.2}, reliability {:.2})",
                    agent.name(),
                    agent.trust_score(),
                    agent.reliability()
                );
                Some(CapabilityMatch::new(
                    agent, capability, score, confidence, reasoning,
                ))
            })
            .collect();
        Ok(matches)
    }

    #[expect(clippy::float_arithmetic, reason = "relevance-weighted score")]
    fn match_intent(
        &self,
        intent: &Intent,
        preferences: &Preferences,
    ) -> DiscoveryResult<Vec<CapabilityMatch>> {
        let mut matches = Vec::new();
        for agent in self.registry.get_active()? {
            let base = scoring::score(&agent, preferences, &self.config);
            let confidence = scoring::confidence(&agent);
            for capability in agent.capabilities() {
                let relevance = intent.relevance(capability);
                if relevance <= RELEVANCE_FLOOR {
                    continue;
                }
                let score = relevance * base;
                if score < self.config.min_score {
                    continue;
                }
                let reasoning = format!(
                    "{} can {} for \"{}\" (relevance {relevance:.2})",
                    agent.name(),
                    catalog::display_name(capability.capability_type()).to_lowercase(),
                    intent.text()
                );
                matches.push(CapabilityMatch::new(
                    agent.clone(),
                    capability.clone(),
                    score,
                    confidence,
                    reasoning,
                ));
            }
        }
        Ok(matches)
    }

    fn rank(
        &self,
        mut matches: Vec<CapabilityMatch>,
        request: &CapabilityRequest,
    ) -> Vec<CapabilityMatch> {
        let preferences = request.preferences();
        matches.retain(|candidate| !preferences.is_excluded(candidate.agent_id()));
        matches.sort_by(|a, b| b.score().total_cmp(&a.score()));
        if let Some(min_score) = request.min_score() {
            matches.retain(|candidate| candidate.score() >= min_score);
        }

        let cap = request.max_results().unwrap_or(self.config.max_results);
        if self.config.keep_alternatives {
            for overflow in matches.iter_mut().skip(cap) {
                overflow.mark_alternative();
            }
        } else {
            matches.truncate(cap);
        }
        matches
    }
}
