//! Conductor: capability routing for agent hosts.
//!
//! Callers describe *what* they need, either as a capability type such as
//! `email.send` or as free text, and the crate decides *who* does it and
//! runs it under a deadline with retries.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and agent invocation
//! - **Adapters**: In-memory and in-process implementations of ports
//!
//! # Modules
//!
//! - [`capability`]: Capability vocabulary, schemas and parameter validation
//! - [`agent_registry`]: Agent records, status and call statistics
//! - [`discovery`]: Scored lookup of agents by capability or intent
//! - [`execution`]: Validated, retried, cancellable agent invocation

pub mod agent_registry;
pub mod capability;
pub mod discovery;
pub mod execution;
