//! Domain model for registered agents.
//!
//! An [`Agent`] couples identity and capability declarations with the
//! rolling statistics (trust, reliability, latency) that discovery scoring
//! reads. All infrastructure concerns stay outside the domain boundary.

mod agent;
mod error;
mod ids;
mod status;

pub use agent::{Agent, AgentProfile, BUILTIN_TRUST_SCORE, DEFAULT_TRUST_SCORE};
pub use error::{AgentDomainError, ParseAgentKindError, ParseAgentStatusError};
pub use ids::AgentId;
pub use status::{AgentKind, AgentStatus};
