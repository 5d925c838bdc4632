//! In-memory integration tests for agent registration and persistence.

use std::sync::Arc;

use crate::in_memory::helpers::{agent_repository, registry_over};
use conductor::agent_registry::{
    adapters::memory::InMemoryAgentRepository,
    domain::{AgentId, AgentKind, AgentStatus},
    services::{RegisterAgentRequest, RegistryServiceError},
};
use conductor::capability::{catalog, types};
use rstest::rstest;

fn agent_id(raw: &str) -> AgentId {
    AgentId::new(raw).expect("valid agent id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registry_state_survives_a_reload(agent_repository: Arc<InMemoryAgentRepository>) {
    let first = registry_over(&agent_repository);
    first
        .register_builtin_agents()
        .await
        .expect("builtin registration");
    first
        .register(
            RegisterAgentRequest::new("remote.search", AgentKind::Remote)
                .with_endpoint("https://search.example.com")
                .with_capabilities(catalog::resolve(&types::WEB_SEARCH)),
        )
        .await
        .expect("remote registration");
    first
        .record_call(&agent_id("remote.search"), true, 120.0)
        .await
        .expect("call recorded");
    first
        .update_status(&agent_id("builtin.file"), AgentStatus::Maintenance)
        .await
        .expect("status update");

    let second = registry_over(&agent_repository);
    let loaded = second.load().await.expect("reload succeeds");

    assert_eq!(loaded, 7);
    let remote = second
        .get(&agent_id("remote.search"))
        .expect("remote agent restored");
    assert_eq!(remote.total_calls(), 1);
    assert_eq!(remote.endpoint(), Some("https://search.example.com"));
    assert_eq!(
        second
            .get(&agent_id("builtin.file"))
            .expect("file agent restored")
            .status(),
        AgentStatus::Maintenance
    );
    assert_eq!(second.get_active().expect("active agents").len(), 6);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unregister_removes_the_stored_record(agent_repository: Arc<InMemoryAgentRepository>) {
    let registry = registry_over(&agent_repository);
    registry
        .register_builtin_agents()
        .await
        .expect("builtin registration");

    registry
        .unregister(&agent_id("builtin.task"))
        .await
        .expect("unregister succeeds");

    assert!(agent_repository
        .stored(&agent_id("builtin.task"))
        .expect("repository readable")
        .is_none());
    assert!(matches!(
        registry.get(&agent_id("builtin.task")),
        Err(RegistryServiceError::NotFound(_))
    ));
    assert!(registry
        .get_by_capability(&types::TASK_CREATE)
        .expect("capability query")
        .is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn kind_queries_separate_builtin_and_remote(
    agent_repository: Arc<InMemoryAgentRepository>,
) {
    let registry = registry_over(&agent_repository);
    registry
        .register_builtin_agents()
        .await
        .expect("builtin registration");
    registry
        .register(
            RegisterAgentRequest::new("plugin.translate", AgentKind::Plugin)
                .with_capabilities(catalog::resolve(&types::TEXT_TRANSLATE)),
        )
        .await
        .expect("plugin registration");

    assert_eq!(
        registry
            .get_by_kind(AgentKind::Builtin)
            .expect("kind query")
            .len(),
        6
    );
    let translators: Vec<String> = registry
        .get_by_capability(&types::TEXT_TRANSLATE)
        .expect("capability query")
        .iter()
        .map(|agent| agent.id().to_string())
        .collect();
    assert_eq!(translators, ["builtin.text", "plugin.translate"]);
}
