//! Discovery request types.

use crate::agent_registry::domain::AgentId;
use crate::capability::CapabilityType;
use serde::{Deserialize, Serialize};

/// What the caller is asking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestTarget {
    /// An explicit capability identifier.
    Capability(CapabilityType),
    /// Free-text intent resolved through keyword matching.
    Intent(String),
}

/// Caller constraints applied during scoring and filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Agents that score full marks on the preference component.
    pub preferred_agents: Vec<AgentId>,
    /// Agents removed from the results.
    pub excluded_agents: Vec<AgentId>,
    /// Latency cap in milliseconds; slower agents score zero on latency.
    pub max_latency_ms: Option<f64>,
    /// Only builtin or local agents satisfy the preference component.
    pub require_local: bool,
    /// Only trusted agents satisfy the preference component.
    pub require_trusted: bool,
}

impl Preferences {
    /// Adds a preferred agent.
    #[must_use]
    pub fn prefer(mut self, id: AgentId) -> Self {
        self.preferred_agents.push(id);
        self
    }

    /// Adds an excluded agent.
    #[must_use]
    pub fn exclude(mut self, id: AgentId) -> Self {
        self.excluded_agents.push(id);
        self
    }

    /// Sets the latency cap.
    #[must_use]
    pub const fn with_max_latency_ms(mut self, max_latency_ms: f64) -> Self {
        self.max_latency_ms = Some(max_latency_ms);
        self
    }

    /// Requires builtin or local agents.
    #[must_use]
    pub const fn require_local(mut self) -> Self {
        self.require_local = true;
        self
    }

    /// Requires trusted agents.
    #[must_use]
    pub const fn require_trusted(mut self) -> Self {
        self.require_trusted = true;
        self
    }

    /// Returns whether the agent is on the preferred list.
    #[must_use]
    pub fn is_preferred(&self, id: &AgentId) -> bool {
        self.preferred_agents.contains(id)
    }

    /// Returns whether the agent is on the excluded list.
    #[must_use]
    pub fn is_excluded(&self, id: &AgentId) -> bool {
        self.excluded_agents.contains(id)
    }
}

/// A discovery query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRequest {
    target: RequestTarget,
    preferences: Preferences,
    min_score: Option<f64>,
    max_results: Option<usize>,
}

impl CapabilityRequest {
    /// Creates a request for an explicit capability type.
    #[must_use]
    pub fn for_type(capability_type: CapabilityType) -> Self {
        Self::new(RequestTarget::Capability(capability_type))
    }

    /// Creates a request resolved from free-text intent.
    #[must_use]
    pub fn for_intent(intent: impl Into<String>) -> Self {
        Self::new(RequestTarget::Intent(intent.into()))
    }

    fn new(target: RequestTarget) -> Self {
        Self {
            target,
            preferences: Preferences::default(),
            min_score: None,
            max_results: None,
        }
    }

    /// Replaces the caller preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Drops matches scoring below `min_score`.
    #[must_use]
    pub const fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Overrides the configured result cap.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Returns the request target.
    #[must_use]
    pub const fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// Returns the caller preferences.
    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Returns the caller-supplied minimum score.
    #[must_use]
    pub const fn min_score(&self) -> Option<f64> {
        self.min_score
    }

    /// Returns the caller-supplied result cap.
    #[must_use]
    pub const fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// Returns the key used to group batch results: the capability type or
    /// the intent text.
    #[must_use]
    pub fn key(&self) -> String {
        match &self.target {
            RequestTarget::Capability(capability_type) => capability_type.to_string(),
            RequestTarget::Intent(intent) => intent.clone(),
        }
    }
}
