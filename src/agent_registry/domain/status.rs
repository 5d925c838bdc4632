//! Agent lifecycle status and back-end kind.

use super::{ParseAgentKindError, ParseAgentStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a registered agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// The agent is available for discovery and execution.
    Active,
    /// The agent has been switched off.
    Inactive,
    /// The agent is temporarily unavailable for planned work.
    Maintenance,
    /// The agent failed a health probe.
    Error,
    /// The status has not been established.
    Unknown,
}

impl AgentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentStatus {
    type Error = ParseAgentStatusError;

    fn try_from(value: &str) -> Result<Self, ParseAgentStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "maintenance" => Ok(Self::Maintenance),
            "error" => Ok(Self::Error),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParseAgentStatusError(value.to_owned())),
        }
    }
}

/// Back-end variant of an agent, used to select an execution handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// First-party agent compiled into the host.
    Builtin,
    /// Agent running as a local process.
    Local,
    /// Agent reached over the network.
    Remote,
    /// Agent speaking an external agent protocol.
    Protocol,
    /// Dynamically loaded plugin.
    Plugin,
}

impl AgentKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Protocol => "protocol",
            Self::Plugin => "plugin",
        }
    }

    /// Returns whether agents of this kind run on the local host.
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Builtin | Self::Local)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentKind {
    type Error = ParseAgentKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "builtin" => Ok(Self::Builtin),
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "protocol" => Ok(Self::Protocol),
            "plugin" => Ok(Self::Plugin),
            _ => Err(ParseAgentKindError(value.to_owned())),
        }
    }
}
