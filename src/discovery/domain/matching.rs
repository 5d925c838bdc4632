//! Ranked discovery results.

use crate::agent_registry::domain::{Agent, AgentId};
use crate::capability::Capability;
use serde::{Deserialize, Serialize};

/// One agent able to serve a request, with its ranking data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityMatch {
    agent: Agent,
    capability: Capability,
    score: f64,
    confidence: f64,
    reasoning: String,
    alternative: bool,
}

impl CapabilityMatch {
    /// Creates a primary match.
    #[must_use]
    pub const fn new(
        agent: Agent,
        capability: Capability,
        score: f64,
        confidence: f64,
        reasoning: String,
    ) -> Self {
        Self {
            agent,
            capability,
            score,
            confidence,
            reasoning,
            alternative: false,
        }
    }

    /// Returns the matched agent as of discovery time.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Returns the matched agent's identifier.
    #[must_use]
    pub const fn agent_id(&self) -> &AgentId {
        self.agent.id()
    }

    /// Returns the agent's capability that satisfied the request.
    #[must_use]
    pub const fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Returns the ranking score in `[0, 1]`.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Returns the confidence in `[0, 1]`.
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Returns a human-readable explanation of the match.
    #[must_use]
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Returns whether the match fell beyond the result cap.
    #[must_use]
    pub const fn is_alternative(&self) -> bool {
        self.alternative
    }

    pub(crate) const fn mark_alternative(&mut self) {
        self.alternative = true;
    }
}
