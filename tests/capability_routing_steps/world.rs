//! Shared world state for capability routing BDD scenarios.

use std::sync::Arc;

use conductor::agent_registry::{
    adapters::memory::InMemoryAgentRepository, domain::AgentKind, services::AgentRegistry,
};
use conductor::capability::CapabilityType;
use conductor::discovery::{
    domain::{CapabilityMatch, DiscoveryConfig},
    services::DiscoveryService,
};
use conductor::execution::{
    adapters::{ScriptedHandler, memory::InMemoryExecutionResultRepository},
    domain::{ChainExecution, ExecutionResult},
    services::{EngineConfig, ExecutionEngine, ExecutionError},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Engine type used by the BDD world.
pub type TestEngine =
    ExecutionEngine<InMemoryAgentRepository, InMemoryExecutionResultRepository, DefaultClock>;

/// Scenario world for capability routing behaviour tests.
pub struct RoutingWorld {
    /// The engine under test.
    pub engine: TestEngine,
    /// Handler serving built-in agents.
    pub handler: ScriptedHandler,
    /// Result of the last execution.
    pub last_execution: Option<Result<ExecutionResult, ExecutionError>>,
    /// Result of the last chain run.
    pub last_chain: Option<Result<ChainExecution, ExecutionError>>,
    /// Best match from the last discovery.
    pub last_match: Option<CapabilityMatch>,
    /// Outcome of the last health probe.
    pub last_health: Option<bool>,
}

impl RoutingWorld {
    /// Creates a world with an empty registry and a scripted handler.
    ///
    /// # Panics
    ///
    /// Panics if the handler cannot be registered.
    #[must_use]
    pub fn new() -> Self {
        let registry = Arc::new(AgentRegistry::new(
            Arc::new(InMemoryAgentRepository::new()),
            Arc::new(DefaultClock),
        ));
        let discovery = Arc::new(DiscoveryService::new(registry, DiscoveryConfig::uncached()));
        let engine = ExecutionEngine::new(
            discovery,
            Arc::new(InMemoryExecutionResultRepository::new()),
            Arc::new(DefaultClock),
            EngineConfig::responsive(),
        );
        let handler = ScriptedHandler::new();
        engine
            .register_handler(AgentKind::Builtin, Arc::new(handler.clone()))
            .expect("handler registration");
        Self {
            engine,
            handler,
            last_execution: None,
            last_chain: None,
            last_match: None,
            last_health: None,
        }
    }
}

impl Default for RoutingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RoutingWorld {
    RoutingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a capability type written in a feature file.
///
/// # Errors
///
/// Returns an error when the text is not a valid capability type.
pub fn capability(raw: &str) -> Result<CapabilityType, eyre::Report> {
    CapabilityType::new(raw).map_err(|err| eyre::eyre!("invalid capability '{raw}': {err}"))
}
