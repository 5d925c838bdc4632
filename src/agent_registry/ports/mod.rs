//! Port contracts for agent persistence.

pub mod repository;

pub use repository::{AgentRepository, AgentRepositoryError, AgentRepositoryResult};
