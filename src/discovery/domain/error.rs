//! Discovery error types.

use crate::agent_registry::services::RegistryServiceError;
use thiserror::Error;

/// Errors returned by discovery operations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The request named neither a capability type nor any intent text.
    #[error("discovery request has an empty intent")]
    EmptyRequest,

    /// No agent matched the request.
    #[error("no agent matches {0}")]
    NoMatch(String),

    /// The registry could not be read.
    #[error(transparent)]
    Registry(#[from] RegistryServiceError),

    /// The capability index lock was poisoned.
    #[error("capability index unavailable: {0}")]
    IndexUnavailable(String),

    /// One request of a batch failed, aborting the batch.
    #[error("batch request {index} failed: {source}")]
    BatchFailed {
        /// Position of the failing request in the batch.
        index: usize,
        /// The failure.
        #[source]
        source: Box<DiscoveryError>,
    },
}

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
