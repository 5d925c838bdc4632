//! Scripted handler for deterministic tests and local flows.

use crate::agent_registry::domain::{Agent, AgentId};
use crate::capability::{CapabilityType, ParameterValue};
use crate::execution::{
    domain::{ExecutionRequest, RequestId},
    ports::{AgentHandler, HandlerError, HandlerResult},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::Duration;

/// One recorded handler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Agent the request ran against.
    pub agent_id: AgentId,
    /// Requested capability.
    pub capability_type: CapabilityType,
    /// Originating request.
    pub request_id: RequestId,
}

#[derive(Debug, Default)]
struct ScriptState {
    outputs: HashMap<CapabilityType, ParameterValue>,
    failures_remaining: HashMap<CapabilityType, u32>,
    always_failing: HashSet<CapabilityType>,
    delays: HashMap<CapabilityType, Duration>,
    unhealthy: HashSet<AgentId>,
    invocations: Vec<Invocation>,
}

/// Handler whose behaviour is programmed per capability type.
///
/// Records every invocation. Without a programmed output it returns the
/// request parameters. Delays are awaited on the tokio timer so the engine
/// can cut them short on timeout or cancellation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHandler {
    state: Arc<RwLock<ScriptState>>,
}

enum Scripted {
    Respond(ParameterValue),
    Fail(String),
}

impl ScriptedHandler {
    /// Creates a handler that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> HandlerResult<RwLockWriteGuard<'_, ScriptState>> {
        self.state
            .write()
            .map_err(|err| HandlerError::runtime(std::io::Error::other(err.to_string())))
    }

    /// Returns `output` for every call to `capability_type`.
    ///
    /// # Errors
    ///
    /// Returns handler runtime errors when lock acquisition fails.
    pub fn respond_with(
        &self,
        capability_type: CapabilityType,
        output: impl Into<ParameterValue>,
    ) -> HandlerResult<()> {
        self.write()?.outputs.insert(capability_type, output.into());
        Ok(())
    }

    /// Fails the next `times` calls to `capability_type`.
    ///
    /// # Errors
    ///
    /// Returns handler runtime errors when lock acquisition fails.
    pub fn fail_times(&self, capability_type: CapabilityType, times: u32) -> HandlerResult<()> {
        self.write()?
            .failures_remaining
            .insert(capability_type, times);
        Ok(())
    }

    /// Fails every call to `capability_type`.
    ///
    /// # Errors
    ///
    /// Returns handler runtime errors when lock acquisition fails.
    pub fn fail_always(&self, capability_type: CapabilityType) -> HandlerResult<()> {
        self.write()?.always_failing.insert(capability_type);
        Ok(())
    }

    /// Waits `delay` before answering calls to `capability_type`.
    ///
    /// # Errors
    ///
    /// Returns handler runtime errors when lock acquisition fails.
    pub fn delay(&self, capability_type: CapabilityType, delay: Duration) -> HandlerResult<()> {
        self.write()?.delays.insert(capability_type, delay);
        Ok(())
    }

    /// Makes health checks for `agent_id` report unhealthy.
    ///
    /// # Errors
    ///
    /// Returns handler runtime errors when lock acquisition fails.
    pub fn set_unhealthy(&self, agent_id: AgentId) -> HandlerResult<()> {
        self.write()?.unhealthy.insert(agent_id);
        Ok(())
    }

    /// Makes health checks for `agent_id` report healthy again.
    ///
    /// # Errors
    ///
    /// Returns handler runtime errors when lock acquisition fails.
    pub fn set_healthy(&self, agent_id: &AgentId) -> HandlerResult<()> {
        self.write()?.unhealthy.remove(agent_id);
        Ok(())
    }

    /// Returns every recorded invocation in call order.
    ///
    /// # Errors
    ///
    /// Returns handler runtime errors when lock acquisition fails.
    pub fn invocations(&self) -> HandlerResult<Vec<Invocation>> {
        let state = self
            .state
            .read()
            .map_err(|err| HandlerError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(state.invocations.clone())
    }

    /// Returns how many times `capability_type` was invoked.
    ///
    /// # Errors
    ///
    /// Returns handler runtime errors when lock acquisition fails.
    pub fn invocation_count(&self, capability_type: &CapabilityType) -> HandlerResult<usize> {
        Ok(self
            .invocations()?
            .iter()
            .filter(|invocation| &invocation.capability_type == capability_type)
            .count())
    }

    fn plan(
        &self,
        agent: &Agent,
        request: &ExecutionRequest,
    ) -> HandlerResult<(Scripted, Option<Duration>)> {
        let mut state = self.write()?;
        let capability_type = request.capability_type();
        state.invocations.push(Invocation {
            agent_id: agent.id().clone(),
            capability_type: capability_type.clone(),
            request_id: request.id(),
        });

        let delay = state.delays.get(capability_type).copied();
        if state.always_failing.contains(capability_type) {
            return Ok((Scripted::Fail(format!("{capability_type} always fails")), delay));
        }
        if let Some(remaining) = state.failures_remaining.get_mut(capability_type)
            && *remaining > 0
        {
            *remaining -= 1;
            return Ok((
                Scripted::Fail(format!("{capability_type} scripted failure")),
                delay,
            ));
        }

        let output = state
            .outputs
            .get(capability_type)
            .cloned()
            .unwrap_or_else(|| request.parameters().clone().into());
        Ok((Scripted::Respond(output), delay))
    }
}

#[async_trait]
impl AgentHandler for ScriptedHandler {
    async fn execute(
        &self,
        agent: &Agent,
        request: &ExecutionRequest,
    ) -> HandlerResult<ParameterValue> {
        let (scripted, delay) = self.plan(agent, request)?;
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        match scripted {
            Scripted::Respond(output) => Ok(output),
            Scripted::Fail(reason) => Err(HandlerError::Failed(reason)),
        }
    }

    async fn health_check(&self, agent: &Agent) -> HandlerResult<bool> {
        let state = self
            .state
            .read()
            .map_err(|err| HandlerError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(!state.unhealthy.contains(agent.id()))
    }
}
