//! Capability discovery.
//!
//! Given an explicit capability type or a free-text intent, the discovery
//! service returns registered agents ranked by a weighted score over
//! trust, reliability, latency and caller preferences.
//!
//! - Domain types and scoring rules in [`domain`]
//! - The [`services::DiscoveryService`] orchestrating index and registry

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
