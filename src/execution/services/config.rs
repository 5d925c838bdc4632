//! Execution engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Worker pool, queue and retry settings.
///
/// # Examples
///
/// ```
/// use conductor::execution::services::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.worker_count, 4);
/// assert_eq!(config.max_retries, 3);
///
/// let single = EngineConfig::single_attempt();
/// assert_eq!(single.max_retries, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of worker tasks started by `start`.
    pub worker_count: usize,
    /// Bound of the asynchronous work queue; at least one slot is allocated.
    pub queue_capacity: usize,
    /// Timeout applied when a request sets none.
    pub default_timeout: Duration,
    /// Retries after the first attempt when a request sets none.
    pub max_retries: u32,
    /// Backoff unit; the wait before retry `n` is `n` units.
    pub retry_backoff: Duration,
    /// Terminal results kept in memory once persisted; older ones are read
    /// back from the result repository.
    pub retained_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            queue_capacity: 100,
            default_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
            retained_results: 1000,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration that never retries.
    #[must_use]
    pub fn single_attempt() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Creates a configuration with short timers for local runs and tests.
    #[must_use]
    pub const fn responsive() -> Self {
        Self {
            worker_count: 2,
            queue_capacity: 16,
            default_timeout: Duration::from_secs(2),
            max_retries: 2,
            retry_backoff: Duration::from_millis(10),
            retained_results: 1000,
        }
    }
}
