//! Agent registration and lookup.
//!
//! The registry is the single owner of agent records: identity, declared
//! capabilities, lifecycle status and the rolling call statistics consumed
//! by discovery scoring. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
