//! Execution requests and their correlation context.

use super::{ExecutionDomainError, RequestId};
use crate::agent_registry::domain::AgentId;
use crate::capability::{CapabilityType, ParameterValue, Parameters};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Scheduling hint from 1 (highest) to 5 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Highest priority.
    pub const HIGHEST: Self = Self(1);
    /// Default priority.
    pub const NORMAL: Self = Self(3);
    /// Lowest priority.
    pub const LOWEST: Self = Self(5);

    /// Creates a validated priority.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionDomainError::InvalidPriority`] outside `1..=5`.
    pub const fn new(value: u8) -> Result<Self, ExecutionDomainError> {
        if value >= Self::HIGHEST.0 && value <= Self::LOWEST.0 {
            Ok(Self(value))
        } else {
            Err(ExecutionDomainError::InvalidPriority(value))
        }
    }

    /// Returns the numeric priority.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<u8> for Priority {
    type Error = ExecutionDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

/// Correlation identifiers carried through an execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionContext {
    /// User on whose behalf the execution runs.
    pub user_id: Option<String>,
    /// Persona or role the user is acting under.
    pub hat_id: Option<String>,
    /// Work item the execution belongs to.
    pub item_id: Option<String>,
    /// Conversation or session identifier.
    pub session_id: Option<String>,
    /// Parent execution or chain identifier.
    pub parent_execution_id: Option<Uuid>,
}

impl ExecutionContext {
    /// Sets the user id.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the hat id.
    #[must_use]
    pub fn with_hat(mut self, hat_id: impl Into<String>) -> Self {
        self.hat_id = Some(hat_id.into());
        self
    }

    /// Sets the item id.
    #[must_use]
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    /// Sets the session id.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the parent execution id.
    #[must_use]
    pub const fn with_parent(mut self, parent: Uuid) -> Self {
        self.parent_execution_id = Some(parent);
        self
    }
}

/// A request to run one capability.
///
/// Without a target agent the engine discovers the best match for the
/// capability type before executing.
///
/// # Examples
///
/// ```
/// use conductor::capability::types::WEB_SEARCH;
/// use conductor::execution::domain::ExecutionRequest;
///
/// let request = ExecutionRequest::new(WEB_SEARCH)
///     .with_parameter("query", "tokio watch channel")
///     .asynchronous();
/// assert!(request.is_async());
/// assert!(request.agent_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    id: RequestId,
    agent_id: Option<AgentId>,
    capability_type: CapabilityType,
    parameters: Parameters,
    context: ExecutionContext,
    timeout: Option<Duration>,
    priority: Priority,
    run_async: bool,
    max_retries: Option<u32>,
}

impl ExecutionRequest {
    /// Creates a synchronous request with default priority.
    #[must_use]
    pub fn new(capability_type: CapabilityType) -> Self {
        Self {
            id: RequestId::new(),
            agent_id: None,
            capability_type,
            parameters: Parameters::new(),
            context: ExecutionContext::default(),
            timeout: None,
            priority: Priority::default(),
            run_async: false,
            max_retries: None,
        }
    }

    /// Targets a specific agent.
    #[must_use]
    pub fn for_agent(mut self, agent_id: AgentId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Replaces all parameters.
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

    /// Replaces the correlation context.
    #[must_use]
    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    /// Overrides the engine's default timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Overrides the engine's default retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Queues the request for the worker pool instead of running inline.
    #[must_use]
    pub const fn asynchronous(mut self) -> Self {
        self.run_async = true;
        self
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the target agent, if any.
    #[must_use]
    pub const fn agent_id(&self) -> Option<&AgentId> {
        self.agent_id.as_ref()
    }

    /// Returns the requested capability type.
    #[must_use]
    pub const fn capability_type(&self) -> &CapabilityType {
        &self.capability_type
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the correlation context.
    #[must_use]
    pub const fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Returns the timeout override.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns whether the request runs on the worker pool.
    #[must_use]
    pub const fn is_async(&self) -> bool {
        self.run_async
    }

    /// Returns the retry budget override.
    #[must_use]
    pub const fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Binds the request to its resolved agent and validated parameters.
    pub(crate) fn resolve(&mut self, agent_id: AgentId, parameters: Parameters) {
        self.agent_id = Some(agent_id);
        self.parameters = parameters;
    }
}
