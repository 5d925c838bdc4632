//! Tunables for capability discovery.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Relative weights of the five scoring components.
///
/// # Examples
///
/// ```
/// use conductor::discovery::domain::ScoringWeights;
///
/// let weights = ScoringWeights::default();
/// assert!((weights.capability - 0.4).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight of the capability-match component.
    pub capability: f64,
    /// Weight of the agent trust score.
    pub trust: f64,
    /// Weight of the observed reliability.
    pub reliability: f64,
    /// Weight of the latency component.
    pub latency: f64,
    /// Weight of the caller-preference component.
    pub preference: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            capability: 0.4,
            trust: 0.2,
            reliability: 0.2,
            latency: 0.1,
            preference: 0.1,
        }
    }
}

/// Discovery service configuration.
///
/// # Examples
///
/// ```
/// use conductor::discovery::domain::DiscoveryConfig;
///
/// let config = DiscoveryConfig::default();
/// assert_eq!(config.max_results, 10);
///
/// let uncached = DiscoveryConfig::uncached();
/// assert!(uncached.index_ttl.is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Maximum age of the capability index before it is rebuilt.
    pub index_ttl: Duration,
    /// Default cap on returned matches.
    pub max_results: usize,
    /// Minimum effective score for intent matches.
    pub min_score: f64,
    /// Keep matches beyond the cap and flag them as alternatives.
    pub keep_alternatives: bool,
    /// Trust score at or above which an agent counts as trusted.
    pub trusted_threshold: f64,
    /// Latency that maps to a zero latency score when the caller sets no cap.
    pub reference_latency_ms: f64,
    /// Call count below which reliability is replaced by a neutral value.
    pub new_agent_call_threshold: u64,
    /// Reliability assumed for agents with too few recorded calls.
    pub neutral_reliability: f64,
    /// Scoring component weights.
    pub weights: ScoringWeights,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            index_ttl: Duration::from_secs(5 * 60),
            max_results: 10,
            min_score: 0.1,
            keep_alternatives: false,
            trusted_threshold: 0.7,
            reference_latency_ms: 5000.0,
            new_agent_call_threshold: 10,
            neutral_reliability: 0.8,
            weights: ScoringWeights::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Creates a configuration that rebuilds the index on every query.
    ///
    /// Useful when agents change faster than any reasonable TTL, and in tests.
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            index_ttl: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Creates a configuration that keeps overflow matches as alternatives.
    #[must_use]
    pub fn with_alternatives() -> Self {
        Self {
            keep_alternatives: true,
            ..Self::default()
        }
    }
}
