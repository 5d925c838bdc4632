//! In-memory adapters.

mod agent_repository;

pub use agent_repository::InMemoryAgentRepository;
