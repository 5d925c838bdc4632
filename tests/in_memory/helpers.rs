//! Shared test helpers for in-memory integration tests.

use std::sync::{Arc, Once};
use std::time::Duration;

use conductor::agent_registry::{
    adapters::memory::InMemoryAgentRepository, domain::AgentKind, services::AgentRegistry,
};
use conductor::discovery::{domain::DiscoveryConfig, services::DiscoveryService};
use conductor::execution::{
    adapters::{ScriptedHandler, memory::InMemoryExecutionResultRepository},
    domain::{ExecutionId, ExecutionResult},
    services::{EngineConfig, ExecutionEngine},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Registry type used across integration tests.
pub type TestRegistry = AgentRegistry<InMemoryAgentRepository, DefaultClock>;

/// Engine type used across integration tests.
pub type TestEngine =
    ExecutionEngine<InMemoryAgentRepository, InMemoryExecutionResultRepository, DefaultClock>;

static TRACING: Once = Once::new();

/// Installs a test-friendly tracing subscriber once per process.
///
/// Honours `RUST_LOG`; output is captured by the test harness.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
        drop(installed);
    });
}

/// Provides a shared in-memory agent repository.
#[fixture]
pub fn agent_repository() -> Arc<InMemoryAgentRepository> {
    Arc::new(InMemoryAgentRepository::new())
}

/// Builds a registry over `repository`.
pub fn registry_over(repository: &Arc<InMemoryAgentRepository>) -> Arc<TestRegistry> {
    init_tracing();
    Arc::new(AgentRegistry::new(
        Arc::clone(repository),
        Arc::new(DefaultClock),
    ))
}

/// Builds a fresh registry holding the built-in agents.
pub async fn seeded() -> Arc<TestRegistry> {
    let registry = registry_over(&Arc::new(InMemoryAgentRepository::new()));
    registry
        .register_builtin_agents()
        .await
        .expect("builtin registration");
    registry
}

/// Provides a registry seeded with the built-in agents.
#[fixture]
pub async fn seeded_registry() -> Arc<TestRegistry> {
    seeded().await
}

/// Engine, scripted handler and result store wired together.
pub struct EngineHarness {
    /// Engine under test.
    pub engine: TestEngine,
    /// Handler serving built-in agents.
    pub handler: ScriptedHandler,
    /// Backing result repository.
    pub results: Arc<InMemoryExecutionResultRepository>,
}

/// Builds an engine over a seeded registry with a scripted built-in
/// handler.
pub async fn engine_with(config: EngineConfig) -> EngineHarness {
    let registry = seeded().await;
    let discovery = Arc::new(DiscoveryService::new(registry, DiscoveryConfig::default()));
    let results = Arc::new(InMemoryExecutionResultRepository::new());
    let engine = ExecutionEngine::new(
        discovery,
        Arc::clone(&results),
        Arc::new(DefaultClock),
        config,
    );
    let handler = ScriptedHandler::new();
    engine
        .register_handler(AgentKind::Builtin, Arc::new(handler.clone()))
        .expect("handler registration");
    EngineHarness {
        engine,
        handler,
        results,
    }
}

/// Polls until the execution reaches a terminal status.
pub async fn wait_for_terminal(engine: &TestEngine, id: ExecutionId) -> ExecutionResult {
    for _ in 0..300 {
        let result = engine.get_result(id).await.expect("result should exist");
        if result.status().is_terminal() {
            return result;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("execution {id} did not reach a terminal status");
}
