//! Pure scoring functions used to rank candidate agents.

use super::{DiscoveryConfig, Preferences};
use crate::agent_registry::domain::{Agent, AgentKind};

const BUILTIN_PREFERENCE_BONUS: f64 = 0.2;
const BASELINE_PREFERENCE: f64 = 0.5;
const BUILTIN_CONFIDENCE_FLOOR: f64 = 0.9;

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Returns whether the agent satisfies the caller's trust requirement.
#[must_use]
pub fn is_trusted(agent: &Agent, config: &DiscoveryConfig) -> bool {
    agent.trust_score() >= config.trusted_threshold
}

/// Reliability used for ranking; new agents get the neutral value.
#[must_use]
pub fn effective_reliability(agent: &Agent, config: &DiscoveryConfig) -> f64 {
    if agent.total_calls() < config.new_agent_call_threshold {
        config.neutral_reliability
    } else {
        agent.reliability()
    }
}

/// Latency component: one minus latency normalised against the caller's cap
/// or the reference latency. Agents slower than the caller's cap score zero.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "latency normalisation")]
pub fn latency_score(agent: &Agent, preferences: &Preferences, config: &DiscoveryConfig) -> f64 {
    let latency = agent.avg_latency_ms();
    if let Some(cap) = preferences.max_latency_ms
        && latency > cap
    {
        return 0.0;
    }
    let reference = preferences
        .max_latency_ms
        .unwrap_or(config.reference_latency_ms);
    if reference <= 0.0 {
        return 1.0;
    }
    clamp_unit(1.0 - latency / reference)
}

/// Preference-compatibility component.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "baseline plus builtin bonus")]
pub fn preference_score(agent: &Agent, preferences: &Preferences, config: &DiscoveryConfig) -> f64 {
    if preferences.is_preferred(agent.id()) {
        return 1.0;
    }
    if preferences.is_excluded(agent.id()) {
        return 0.0;
    }
    if preferences.require_local && !agent.kind().is_local() {
        return 0.0;
    }
    if preferences.require_trusted && !is_trusted(agent, config) {
        return 0.0;
    }
    if agent.kind() == AgentKind::Builtin {
        BASELINE_PREFERENCE + BUILTIN_PREFERENCE_BONUS
    } else {
        BASELINE_PREFERENCE
    }
}

/// Weighted ranking score in `[0, 1]`.
///
/// The capability component is always `1.0`: only agents offering a
/// matching capability reach scoring.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "weighted sum")]
pub fn score(agent: &Agent, preferences: &Preferences, config: &DiscoveryConfig) -> f64 {
    let weights = &config.weights;
    let total = weights.capability
        + weights.trust * agent.trust_score()
        + weights.reliability * effective_reliability(agent, config)
        + weights.latency * latency_score(agent, preferences, config)
        + weights.preference * preference_score(agent, preferences, config);
    clamp_unit(total)
}

/// Confidence in `[0, 1]`, independent of the request.
///
/// Starts from trust and blends in reliability as call history grows;
/// builtin agents never drop below 0.9.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "trust and reliability blend")]
pub fn confidence(agent: &Agent) -> f64 {
    let trust = agent.trust_score();
    let reliability = agent.reliability();
    let blended = match agent.total_calls() {
        calls if calls > 100 => 0.5 * trust + 0.5 * reliability,
        calls if calls > 10 => 0.7 * trust + 0.3 * reliability,
        _ => trust,
    };
    let floored = if agent.kind() == AgentKind::Builtin {
        blended.max(BUILTIN_CONFIDENCE_FLOOR)
    } else {
        blended
    };
    clamp_unit(floored)
}
