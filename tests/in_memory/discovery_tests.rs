//! In-memory integration tests for capability discovery.

use std::sync::Arc;

use crate::in_memory::helpers::{TestRegistry, seeded_registry};
use conductor::agent_registry::{
    domain::{AgentId, AgentKind},
    services::RegisterAgentRequest,
};
use conductor::capability::{catalog, types};
use conductor::discovery::{
    domain::{CapabilityMatch, CapabilityRequest, DiscoveryConfig, DiscoveryError, Preferences},
    services::DiscoveryService,
};
use rstest::rstest;

fn agent_id(raw: &str) -> AgentId {
    AgentId::new(raw).expect("valid agent id")
}

async fn with_remote_searcher(registry: &Arc<TestRegistry>) {
    registry
        .register(
            RegisterAgentRequest::new("remote.search", AgentKind::Remote)
                .with_trust_score(0.9)
                .with_capabilities(catalog::resolve(&types::WEB_SEARCH)),
        )
        .await
        .expect("remote registration");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn builtin_outranks_remote_until_preferences_apply(
    #[future] seeded_registry: Arc<TestRegistry>,
) {
    let registry = seeded_registry.await;
    with_remote_searcher(&registry).await;
    let service = DiscoveryService::new(Arc::clone(&registry), DiscoveryConfig::default());

    let best = service
        .discover_best(&CapabilityRequest::for_type(types::WEB_SEARCH))
        .expect("discovery succeeds");
    assert_eq!(best.agent_id(), &agent_id("builtin.web"));

    let excluded = service
        .discover_best(
            &CapabilityRequest::for_type(types::WEB_SEARCH)
                .with_preferences(Preferences::default().exclude(agent_id("builtin.web"))),
        )
        .expect("discovery succeeds");
    assert_eq!(excluded.agent_id(), &agent_id("remote.search"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn local_requirement_ranks_remote_agents_last(#[future] seeded_registry: Arc<TestRegistry>) {
    let registry = seeded_registry.await;
    with_remote_searcher(&registry).await;
    let service = DiscoveryService::new(Arc::clone(&registry), DiscoveryConfig::uncached());
    let remote_score = |matches: &[CapabilityMatch]| {
        matches
            .iter()
            .find(|candidate| candidate.agent_id() == &agent_id("remote.search"))
            .map(CapabilityMatch::score)
            .expect("remote agent stays a candidate")
    };

    let unconstrained = service
        .discover(&CapabilityRequest::for_type(types::WEB_SEARCH))
        .expect("discovery succeeds");
    let local_only = service
        .discover(
            &CapabilityRequest::for_type(types::WEB_SEARCH)
                .with_preferences(Preferences::default().require_local()),
        )
        .expect("discovery succeeds");

    assert!(remote_score(&local_only) < remote_score(&unconstrained));
    let last = local_only.last().expect("candidates returned");
    assert_eq!(last.agent_id(), &agent_id("remote.search"));
    assert!(local_only
        .first()
        .is_some_and(|candidate| candidate.agent().kind().is_local()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn alternatives_are_flagged_beyond_the_cap(#[future] seeded_registry: Arc<TestRegistry>) {
    let registry = seeded_registry.await;
    with_remote_searcher(&registry).await;
    let service = DiscoveryService::new(Arc::clone(&registry), DiscoveryConfig::with_alternatives());

    let matches = service
        .discover(&CapabilityRequest::for_type(types::WEB_SEARCH).with_max_results(1))
        .expect("discovery succeeds");

    assert_eq!(matches.len(), 2);
    let flags: Vec<bool> = matches.iter().map(CapabilityMatch::is_alternative).collect();
    assert_eq!(flags, [false, true]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_discovery_is_keyed_and_all_or_nothing(
    #[future] seeded_registry: Arc<TestRegistry>,
) {
    let registry = seeded_registry.await;
    let service = DiscoveryService::new(Arc::clone(&registry), DiscoveryConfig::default());

    let results = service
        .discover_multiple(&[
            CapabilityRequest::for_type(types::CALENDAR_BOOK),
            CapabilityRequest::for_intent("remind me to call the bank"),
        ])
        .expect("batch succeeds");
    assert_eq!(results.len(), 2);
    assert!(results.values().all(|matches| !matches.is_empty()));

    let failed = service.discover_multiple(&[
        CapabilityRequest::for_type(types::CALENDAR_BOOK),
        CapabilityRequest::for_intent("   "),
    ]);
    assert!(matches!(
        failed,
        Err(DiscoveryError::BatchFailed { index: 1, source })
            if matches!(*source, DiscoveryError::EmptyRequest)
    ));

    let unmatched = service
        .discover_multiple(&[CapabilityRequest::for_type(types::HOME_LIGHTS)])
        .expect("an unmatched type is not an error");
    assert!(unmatched.values().all(Vec::is_empty));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn index_snapshot_counts_builtin_capabilities(#[future] seeded_registry: Arc<TestRegistry>) {
    let registry = seeded_registry.await;
    let service = DiscoveryService::new(Arc::clone(&registry), DiscoveryConfig::default());

    let snapshot = service.refresh_index().expect("index builds");

    assert_eq!(snapshot.capability_count(), 21);
    assert_eq!(
        snapshot.agents_per_capability.get(&types::EMAIL_SEND),
        Some(&1)
    );
}
