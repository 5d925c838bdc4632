//! Capability execution.
//!
//! The engine validates a request against the chosen agent's capability
//! schema, invokes the agent's handler with retries inside a cancellable,
//! time-bounded scope, and records the outcome both on the result and in
//! the agent's rolling statistics.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The [`services::ExecutionEngine`] and its configuration in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
