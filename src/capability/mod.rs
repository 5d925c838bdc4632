//! Capability vocabulary and schemas.
//!
//! This module is the static catalogue shared by the registry, discovery
//! and execution contexts:
//!
//! - [`CapabilityType`] identifiers and the grouped [`types`] vocabulary
//! - [`Capability`] definitions with [`ParameterSpec`] schemas
//! - [`ParameterValue`] payloads validated against those schemas
//! - canonical definitions in [`catalog`]
//!
//! Nothing here holds state.

pub mod catalog;
mod error;
mod ids;
mod schema;
pub mod types;
mod value;

pub use error::{CapabilityError, ParameterError};
pub use ids::CapabilityType;
pub use schema::{Capability, ParameterKind, ParameterSpec, ReturnSpec, ValueRange};
pub use types::CapabilityDomain;
pub use value::{ParameterValue, Parameters};

#[cfg(test)]
mod tests;
