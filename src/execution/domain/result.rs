//! Execution results and timing metrics.

use super::{ExecutionDomainError, ExecutionId, ExecutionRequest, ExecutionStatus, RequestId};
use crate::agent_registry::domain::AgentId;
use crate::capability::{CapabilityType, ParameterValue};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and retry counters for one execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    /// Time between acceptance and the first handler attempt.
    pub queue_time: Duration,
    /// Time spent running, retries and backoff included.
    pub execute_time: Duration,
    /// Number of retries after the first attempt.
    pub retry_count: u32,
}

fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> Duration {
    (to - from).to_std().unwrap_or_default()
}

/// Outcome record of one execution.
///
/// Status changes go through the transition methods, which reject any move
/// out of a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    id: ExecutionId,
    request_id: RequestId,
    agent_id: Option<AgentId>,
    capability_type: CapabilityType,
    status: ExecutionStatus,
    output: Option<ParameterValue>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    duration: Option<Duration>,
    metrics: ExecutionMetrics,
}

impl ExecutionResult {
    /// Creates a pending result for `request`.
    #[must_use]
    pub fn pending(request: &ExecutionRequest, clock: &impl Clock) -> Self {
        Self {
            id: ExecutionId::new(),
            request_id: request.id(),
            agent_id: request.agent_id().cloned(),
            capability_type: request.capability_type().clone(),
            status: ExecutionStatus::Pending,
            output: None,
            error: None,
            created_at: clock.utc(),
            started_at: None,
            completed_at: None,
            duration: None,
            metrics: ExecutionMetrics::default(),
        }
    }

    /// Returns the execution identifier.
    #[must_use]
    pub const fn id(&self) -> ExecutionId {
        self.id
    }

    /// Returns the originating request identifier.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the agent that ran (or was to run) the execution.
    #[must_use]
    pub const fn agent_id(&self) -> Option<&AgentId> {
        self.agent_id.as_ref()
    }

    /// Returns the capability type.
    #[must_use]
    pub const fn capability_type(&self) -> &CapabilityType {
        &self.capability_type
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ExecutionStatus {
        self.status
    }

    /// Returns the handler output on success.
    #[must_use]
    pub const fn output(&self) -> Option<&ParameterValue> {
        self.output.as_ref()
    }

    /// Returns the error text on failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the acceptance timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the total time from acceptance to completion.
    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Returns the timing metrics.
    #[must_use]
    pub const fn metrics(&self) -> ExecutionMetrics {
        self.metrics
    }

    /// Moves a pending result to running on `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidTransition`] unless pending.
    pub fn start(&mut self, agent_id: AgentId, clock: &impl Clock) -> Result<(), ExecutionDomainError> {
        self.transition(ExecutionStatus::Running)?;
        let now = clock.utc();
        self.agent_id = Some(agent_id);
        self.started_at = Some(now);
        self.metrics.queue_time = elapsed(self.created_at, now);
        Ok(())
    }

    /// Marks a running result completed with `output`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidTransition`] unless running.
    pub fn complete(
        &mut self,
        output: ParameterValue,
        clock: &impl Clock,
    ) -> Result<(), ExecutionDomainError> {
        self.transition(ExecutionStatus::Completed)?;
        self.output = Some(output);
        self.finish(clock);
        Ok(())
    }

    /// Ends the result with a failure status and error text.
    ///
    /// `status` must be [`ExecutionStatus::Failed`],
    /// [`ExecutionStatus::Timeout`] or [`ExecutionStatus::Canceled`].
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidTransition`] when the result is
    /// already terminal or `status` is not a failure status.
    pub fn end_with(
        &mut self,
        status: ExecutionStatus,
        error: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), ExecutionDomainError> {
        if !matches!(
            status,
            ExecutionStatus::Failed | ExecutionStatus::Timeout | ExecutionStatus::Canceled
        ) {
            return Err(ExecutionDomainError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.transition(status)?;
        self.error = Some(error.into());
        self.finish(clock);
        Ok(())
    }

    /// Records the number of retries performed.
    pub const fn set_retry_count(&mut self, retry_count: u32) {
        self.metrics.retry_count = retry_count;
    }

    fn transition(&mut self, next: ExecutionStatus) -> Result<(), ExecutionDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(ExecutionDomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    fn finish(&mut self, clock: &impl Clock) {
        let now = clock.utc();
        self.completed_at = Some(now);
        self.duration = Some(elapsed(self.created_at, now));
        if let Some(started_at) = self.started_at {
            self.metrics.execute_time = elapsed(started_at, now);
        }
    }
}
