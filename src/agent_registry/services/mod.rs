//! Application services for agent registration and lookup.

mod builtin;
mod registry;

pub use builtin::builtin_agents;
pub use registry::{AgentRegistry, RegisterAgentRequest, RegistryResult, RegistryServiceError};
