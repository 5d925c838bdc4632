//! Execution lifecycle status.

use super::ParseExecutionStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an execution or chain.
///
/// `Pending` moves to `Running`, which ends in one of the four terminal
/// states. A pending execution may also end directly when it fails
/// validation, is canceled in the queue or is rejected by backpressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Accepted but not yet started.
    Pending,
    /// A handler is being invoked.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error after exhausting retries.
    Failed,
    /// The execution deadline passed.
    Timeout,
    /// The caller canceled the execution.
    Canceled,
}

impl ExecutionStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Timeout => "timeout",
            Self::Canceled => "canceled",
        }
    }

    /// Returns whether no further transition is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Timeout | Self::Canceled
        )
    }

    /// Returns whether moving to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(
                next,
                Self::Running | Self::Failed | Self::Timeout | Self::Canceled
            ),
            Self::Running => next.is_terminal(),
            Self::Completed | Self::Failed | Self::Timeout | Self::Canceled => false,
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ExecutionStatus {
    type Error = ParseExecutionStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "timeout" => Ok(Self::Timeout),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseExecutionStatusError(value.to_owned())),
        }
    }
}
