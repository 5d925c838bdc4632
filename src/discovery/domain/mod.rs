//! Domain model for capability discovery.
//!
//! Requests, ranked matches, the cached capability index and the pure
//! scoring rules that order candidates.

mod config;
mod error;
mod index;
mod intent;
mod matching;
mod request;
pub mod scoring;

pub use config::{DiscoveryConfig, ScoringWeights};
pub use error::{DiscoveryError, DiscoveryResult};
pub use index::{CapabilityIndex, IndexSnapshot};
pub use intent::{Intent, RELEVANCE_FLOOR};
pub use matching::CapabilityMatch;
pub use request::{CapabilityRequest, Preferences, RequestTarget};
