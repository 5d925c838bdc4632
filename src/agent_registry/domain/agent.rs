//! Registered agent aggregate root.

use super::{AgentId, AgentKind, AgentStatus};
use crate::capability::{Capability, CapabilityType};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Default trust score for agents that are not built in.
pub const DEFAULT_TRUST_SCORE: f64 = 0.5;

/// Trust score assigned to built-in agents.
pub const BUILTIN_TRUST_SCORE: f64 = 1.0;

/// Descriptive fields supplied when an agent is registered.
///
/// `status` and `trust_score` are optional: a fresh registration falls back
/// to defaults, a re-registration keeps the stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfile {
    /// Human-readable name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Back-end variant.
    pub kind: AgentKind,
    /// Capabilities offered, in declaration order.
    pub capabilities: Vec<Capability>,
    /// Optional address used by remote or protocol handlers.
    pub endpoint: Option<String>,
    /// Requested lifecycle status.
    pub status: Option<AgentStatus>,
    /// Requested trust score; clamped on write.
    pub trust_score: Option<f64>,
}

/// A registered agent with its capabilities and call statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    name: String,
    description: String,
    kind: AgentKind,
    status: AgentStatus,
    capabilities: Vec<Capability>,
    endpoint: Option<String>,
    trust_score: f64,
    reliability: f64,
    avg_latency_ms: f64,
    total_calls: u64,
    success_calls: u64,
    registered_at: DateTime<Utc>,
    last_seen_at: DateTime<Utc>,
    last_health_at: Option<DateTime<Utc>>,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl Agent {
    /// Creates a freshly registered agent.
    ///
    /// Status defaults to [`AgentStatus::Active`]; trust defaults to
    /// [`BUILTIN_TRUST_SCORE`] for built-in agents and
    /// [`DEFAULT_TRUST_SCORE`] otherwise.
    #[must_use]
    pub fn new(id: AgentId, profile: AgentProfile, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let default_trust = if profile.kind == AgentKind::Builtin {
            BUILTIN_TRUST_SCORE
        } else {
            DEFAULT_TRUST_SCORE
        };
        Self {
            id,
            name: profile.name,
            description: profile.description,
            kind: profile.kind,
            status: profile.status.unwrap_or(AgentStatus::Active),
            capabilities: profile.capabilities,
            endpoint: profile.endpoint,
            trust_score: clamp_unit(profile.trust_score.unwrap_or(default_trust)),
            reliability: 0.0,
            avg_latency_ms: 0.0,
            total_calls: 0,
            success_calls: 0,
            registered_at: timestamp,
            last_seen_at: timestamp,
            last_health_at: None,
        }
    }

    /// Applies a re-registration.
    ///
    /// Descriptive fields are replaced; registration time and call
    /// statistics are preserved.
    pub fn reregister(&mut self, profile: AgentProfile, clock: &impl Clock) {
        self.name = profile.name;
        self.description = profile.description;
        self.kind = profile.kind;
        self.capabilities = profile.capabilities;
        self.endpoint = profile.endpoint;
        if let Some(status) = profile.status {
            self.status = status;
        }
        if let Some(score) = profile.trust_score {
            self.trust_score = clamp_unit(score);
        }
        self.touch(clock);
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> &AgentId {
        &self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the back-end kind.
    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns whether the agent is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }

    /// Returns the capabilities in declaration order.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns the first capability of the given type.
    #[must_use]
    pub fn capability(&self, capability_type: &CapabilityType) -> Option<&Capability> {
        self.capabilities
            .iter()
            .find(|capability| capability.capability_type() == capability_type)
    }

    /// Returns whether the agent offers the given capability type.
    #[must_use]
    pub fn has_capability(&self, capability_type: &CapabilityType) -> bool {
        self.capability(capability_type).is_some()
    }

    /// Returns the endpoint, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns the trust score in `[0, 1]`.
    #[must_use]
    pub const fn trust_score(&self) -> f64 {
        self.trust_score
    }

    /// Returns the observed success rate in `[0, 1]`.
    #[must_use]
    pub const fn reliability(&self) -> f64 {
        self.reliability
    }

    /// Returns the running mean call latency in milliseconds.
    #[must_use]
    pub const fn avg_latency_ms(&self) -> f64 {
        self.avg_latency_ms
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub const fn total_calls(&self) -> u64 {
        self.total_calls
    }

    /// Returns the number of recorded successful calls.
    #[must_use]
    pub const fn success_calls(&self) -> u64 {
        self.success_calls
    }

    /// Returns the first registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the latest registration or status-change timestamp.
    #[must_use]
    pub const fn last_seen_at(&self) -> DateTime<Utc> {
        self.last_seen_at
    }

    /// Returns the latest health-check timestamp.
    #[must_use]
    pub const fn last_health_at(&self) -> Option<DateTime<Utc>> {
        self.last_health_at
    }

    /// Changes the lifecycle status.
    pub fn set_status(&mut self, status: AgentStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Replaces the trust score, clamped to `[0, 1]`.
    pub fn set_trust_score(&mut self, score: f64) {
        self.trust_score = clamp_unit(score);
    }

    /// Records the outcome of one call.
    ///
    /// Latency is folded into an incremental mean and reliability is
    /// recomputed from the updated counters.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "running mean over call counts"
    )]
    pub fn record_call(&mut self, success: bool, latency_ms: f64) {
        self.total_calls = self.total_calls.saturating_add(1);
        if success {
            self.success_calls = self.success_calls.saturating_add(1);
        }

        let calls = self.total_calls as f64;
        self.avg_latency_ms = if self.total_calls == 1 {
            latency_ms
        } else {
            self.avg_latency_ms.mul_add(calls - 1.0, latency_ms) / calls
        };
        self.reliability = self.success_calls as f64 / calls;
    }

    /// Stamps the health-check time and reports whether the agent is active.
    pub fn mark_health_checked(&mut self, clock: &impl Clock) -> bool {
        self.last_health_at = Some(clock.utc());
        self.is_active()
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.last_seen_at = clock.utc();
    }
}
