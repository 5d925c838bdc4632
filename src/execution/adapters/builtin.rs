//! Default handler for built-in agents.

use crate::agent_registry::domain::Agent;
use crate::capability::{ParameterValue, Parameters};
use crate::execution::{
    domain::ExecutionRequest,
    ports::{AgentHandler, HandlerResult},
};
use async_trait::async_trait;

/// Handler used for built-in agents and for any kind without a registered
/// handler.
///
/// Built-in capabilities are served in-process; the handler acknowledges
/// the request and echoes its validated parameters so hosts can route the
/// payload onward. In-process agents always answer health probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinHandler;

impl BuiltinHandler {
    /// Creates the handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AgentHandler for BuiltinHandler {
    async fn execute(
        &self,
        agent: &Agent,
        request: &ExecutionRequest,
    ) -> HandlerResult<ParameterValue> {
        let payload = Parameters::new()
            .with("agent_id", agent.id().as_str())
            .with("capability", request.capability_type().as_str())
            .with("request_id", request.id().to_string())
            .with("parameters", request.parameters().clone())
            .with("status", "accepted");
        Ok(payload.into())
    }

    async fn health_check(&self, _agent: &Agent) -> HandlerResult<bool> {
        Ok(true)
    }
}
