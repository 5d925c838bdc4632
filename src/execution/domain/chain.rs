//! Sequential multi-step executions.

use super::{ChainId, ExecutionDomainError, ExecutionResult, ExecutionStatus};
use crate::agent_registry::domain::AgentId;
use crate::capability::{CapabilityType, ParameterValue, Parameters};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One step of a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    capability_type: CapabilityType,
    agent_id: Option<AgentId>,
    parameters: Parameters,
    depends_on: Vec<usize>,
}

impl ExecutionStep {
    /// Creates a step for `capability_type`.
    #[must_use]
    pub fn new(capability_type: CapabilityType) -> Self {
        Self {
            capability_type,
            agent_id: None,
            parameters: Parameters::new(),
            depends_on: Vec::new(),
        }
    }

    /// Pins the step to an agent; otherwise one is discovered.
    #[must_use]
    pub fn with_agent(mut self, agent_id: AgentId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Replaces the step parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Adds one parameter.
    #[must_use]
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.parameters.insert(name, value);
        self
    }

    /// Records that this step follows step `index`.
    ///
    /// Steps always run in declaration order; dependencies are descriptive.
    #[must_use]
    pub fn depends_on(mut self, index: usize) -> Self {
        self.depends_on.push(index);
        self
    }

    /// Returns the capability type.
    #[must_use]
    pub const fn capability_type(&self) -> &CapabilityType {
        &self.capability_type
    }

    /// Returns the pinned agent.
    #[must_use]
    pub const fn agent_id(&self) -> Option<&AgentId> {
        self.agent_id.as_ref()
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the declared dependencies.
    #[must_use]
    pub fn dependencies(&self) -> &[usize] {
        &self.depends_on
    }
}

/// A chain of steps executed strictly in order, stopping at the first
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainExecution {
    id: ChainId,
    steps: Vec<ExecutionStep>,
    current_step: usize,
    status: ExecutionStatus,
    results: Vec<ExecutionResult>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ChainExecution {
    /// Creates a pending chain.
    #[must_use]
    pub fn new(steps: Vec<ExecutionStep>, clock: &impl Clock) -> Self {
        Self {
            id: ChainId::new(),
            steps,
            current_step: 0,
            status: ExecutionStatus::Pending,
            results: Vec::new(),
            error: None,
            created_at: clock.utc(),
            completed_at: None,
        }
    }

    /// Returns the chain identifier.
    #[must_use]
    pub const fn id(&self) -> ChainId {
        self.id
    }

    /// Returns the steps.
    #[must_use]
    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    /// Returns the index of the next step to run, or of the step that
    /// failed.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    /// Returns the aggregate status.
    #[must_use]
    pub const fn status(&self) -> ExecutionStatus {
        self.status
    }

    /// Returns the results of the steps run so far.
    #[must_use]
    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    /// Returns the failure text, if the chain failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Moves the chain to running.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidTransition`] unless pending.
    pub fn start(&mut self) -> Result<(), ExecutionDomainError> {
        self.transition(ExecutionStatus::Running)
    }

    /// Appends a successful step result and advances the cursor.
    pub fn record_step(&mut self, result: ExecutionResult) {
        self.results.push(result);
        self.current_step = self.current_step.saturating_add(1);
    }

    /// Appends the result of the failing step; the cursor stays on it.
    pub fn record_failed_step(&mut self, result: ExecutionResult) {
        self.results.push(result);
    }

    /// Marks the chain completed.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidTransition`] unless running.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), ExecutionDomainError> {
        self.transition(ExecutionStatus::Completed)?;
        self.completed_at = Some(clock.utc());
        Ok(())
    }

    /// Marks the chain failed.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidTransition`] when already
    /// terminal.
    pub fn fail(
        &mut self,
        error: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), ExecutionDomainError> {
        self.transition(ExecutionStatus::Failed)?;
        self.error = Some(error.into());
        self.completed_at = Some(clock.utc());
        Ok(())
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
}
