//! Identifier type for registered agents.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, caller-assigned identifier of a registered agent
/// (e.g. `builtin.email`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates a validated agent identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyAgentId);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for AgentId {
    type Error = AgentDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
