//! Capability-to-agent index cached by the discovery service.

use crate::agent_registry::domain::{Agent, AgentId};
use crate::capability::CapabilityType;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Mapping from capability type to the ids of active agents offering it.
///
/// The index stores ids only; callers re-read agent records from the
/// registry so scores use current statistics.
#[derive(Debug, Clone, Default)]
pub struct CapabilityIndex {
    entries: HashMap<CapabilityType, Vec<AgentId>>,
    built_at: Option<Instant>,
}

impl CapabilityIndex {
    /// Builds an index over `agents` stamped at `now`.
    #[must_use]
    pub fn build(agents: &[Agent], now: Instant) -> Self {
        let mut entries: HashMap<CapabilityType, Vec<AgentId>> = HashMap::new();
        for agent in agents.iter().filter(|agent| agent.is_active()) {
            for capability in agent.capabilities() {
                let ids = entries
                    .entry(capability.capability_type().clone())
                    .or_default();
                if !ids.contains(agent.id()) {
                    ids.push(agent.id().clone());
                }
            }
        }
        Self {
            entries,
            built_at: Some(now),
        }
    }

    /// Returns whether the index was never built or is at least `ttl` old.
    #[must_use]
    pub fn is_stale(&self, ttl: Duration, now: Instant) -> bool {
        self.built_at
            .is_none_or(|built_at| now.saturating_duration_since(built_at) >= ttl)
    }

    /// Returns the agents indexed under `capability_type`.
    #[must_use]
    pub fn agents_for(&self, capability_type: &CapabilityType) -> &[AgentId] {
        self.entries
            .get(capability_type)
            .map_or(&[], Vec::as_slice)
    }

    /// Summarises the index contents.
    #[must_use]
    pub fn snapshot(&self, now: Instant) -> IndexSnapshot {
        IndexSnapshot {
            agents_per_capability: self
                .entries
                .iter()
                .map(|(capability_type, ids)| (capability_type.clone(), ids.len()))
                .collect(),
            age: self
                .built_at
                .map(|built_at| now.saturating_duration_since(built_at)),
        }
    }
}

/// Point-in-time summary of the capability index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSnapshot {
    /// Number of agents indexed under each capability type.
    pub agents_per_capability: BTreeMap<CapabilityType, usize>,
    /// Time since the last rebuild; `None` if never built.
    pub age: Option<Duration>,
}

impl IndexSnapshot {
    /// Returns the number of indexed capability types.
    #[must_use]
    pub fn capability_count(&self) -> usize {
        self.agents_per_capability.len()
    }
}
