//! Unit tests for scoring rules, intent parsing and the capability index.

use std::time::{Duration, Instant};

use crate::agent_registry::domain::{Agent, AgentId, AgentKind, AgentProfile, AgentStatus};
use crate::capability::{Capability, catalog, types};
use crate::discovery::domain::{
    CapabilityIndex, DiscoveryConfig, Intent, Preferences, scoring,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

fn agent_with(id: &str, kind: AgentKind, trust: f64, calls: &[(bool, f64)]) -> Agent {
    let profile = AgentProfile {
        name: id.to_owned(),
        description: String::new(),
        kind,
        capabilities: catalog::resolve(&types::WEB_SEARCH).into_iter().collect(),
        endpoint: None,
        status: None,
        trust_score: Some(trust),
    };
    let mut agent = Agent::new(AgentId::new(id).expect("valid id"), profile, &DefaultClock);
    for (success, latency) in calls {
        agent.record_call(*success, *latency);
    }
    agent
}

#[fixture]
fn config() -> DiscoveryConfig {
    DiscoveryConfig::default()
}

fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

// ── Scoring ────────────────────────────────────────────────────────

#[rstest]
fn new_agent_uses_neutral_reliability(config: DiscoveryConfig) {
    let agent = agent_with("remote.a", AgentKind::Remote, 0.5, &[(false, 10.0)]);
    assert!(approx(scoring::effective_reliability(&agent, &config), 0.8));
}

#[rstest]
fn established_agent_uses_observed_reliability(config: DiscoveryConfig) {
    let calls = vec![(true, 10.0); 10];
    let agent = agent_with("remote.a", AgentKind::Remote, 0.5, &calls);
    assert!(approx(scoring::effective_reliability(&agent, &config), 1.0));
}

#[rstest]
fn unknown_remote_agent_scores_expected_baseline(config: DiscoveryConfig) {
    // 0.4 + 0.2*0.5 + 0.2*0.8 + 0.1*1.0 + 0.1*0.5
    let agent = agent_with("remote.a", AgentKind::Remote, 0.5, &[]);
    let score = scoring::score(&agent, &Preferences::default(), &config);
    assert!(approx(score, 0.81), "score was {score}");
}

#[rstest]
fn builtin_agent_gets_preference_bonus(config: DiscoveryConfig) {
    let agent = agent_with("builtin.a", AgentKind::Builtin, 1.0, &[]);
    let preference = scoring::preference_score(&agent, &Preferences::default(), &config);
    assert!(approx(preference, 0.7));
}

#[rstest]
fn latency_over_caller_cap_scores_zero(config: DiscoveryConfig) {
    let agent = agent_with("remote.a", AgentKind::Remote, 0.5, &[(true, 900.0)]);
    let capped = Preferences::default().with_max_latency_ms(500.0);
    assert!(approx(scoring::latency_score(&agent, &capped, &config), 0.0));

    let relaxed = Preferences::default().with_max_latency_ms(1800.0);
    assert!(approx(scoring::latency_score(&agent, &relaxed, &config), 0.5));
}

#[rstest]
fn latency_normalises_against_reference(config: DiscoveryConfig) {
    let agent = agent_with("remote.a", AgentKind::Remote, 0.5, &[(true, 1250.0)]);
    let latency = scoring::latency_score(&agent, &Preferences::default(), &config);
    assert!(approx(latency, 0.75));
}

#[rstest]
#[case(Preferences::default().require_local(), AgentKind::Remote, 0.9, 0.0)]
#[case(Preferences::default().require_local(), AgentKind::Local, 0.9, 0.5)]
#[case(Preferences::default().require_trusted(), AgentKind::Remote, 0.6, 0.0)]
#[case(Preferences::default().require_trusted(), AgentKind::Remote, 0.7, 0.5)]
fn locality_and_trust_requirements_gate_preference(
    config: DiscoveryConfig,
    #[case] preferences: Preferences,
    #[case] kind: AgentKind,
    #[case] trust: f64,
    #[case] expected: f64,
) {
    let agent = agent_with("agent.a", kind, trust, &[]);
    let preference = scoring::preference_score(&agent, &preferences, &config);
    assert!(approx(preference, expected));
}

#[rstest]
fn preferred_beats_excluded_and_excluded_scores_zero(config: DiscoveryConfig) {
    let agent = agent_with("remote.a", AgentKind::Remote, 0.5, &[]);
    let id = agent.id().clone();
    let preferred = Preferences::default().prefer(id.clone());
    let excluded = Preferences::default().exclude(id);
    assert!(approx(scoring::preference_score(&agent, &preferred, &config), 1.0));
    assert!(approx(scoring::preference_score(&agent, &excluded, &config), 0.0));
}

#[rstest]
fn trusted_reliable_agent_outranks_weak_agent(config: DiscoveryConfig) {
    let mut strong_calls = vec![(true, 100.0); 99];
    strong_calls.push((false, 100.0));
    let strong = agent_with("remote.strong", AgentKind::Remote, 0.95, &strong_calls);
    let mut weak_calls = vec![(true, 100.0); 5];
    weak_calls.extend(vec![(false, 100.0); 5]);
    let weak = agent_with("remote.weak", AgentKind::Remote, 0.3, &weak_calls);

    let preferences = Preferences::default();
    assert!(
        scoring::score(&strong, &preferences, &config)
            > scoring::score(&weak, &preferences, &config)
    );
}

#[rstest]
#[case(5, 0.6)]
#[case(20, 0.72)]
#[case(200, 0.8)]
fn confidence_blends_reliability_with_history(#[case] calls: usize, #[case] expected: f64) {
    let history = vec![(true, 10.0); calls];
    let agent = agent_with("remote.a", AgentKind::Remote, 0.6, &history);
    assert!(approx(scoring::confidence(&agent), expected));
}

#[rstest]
fn builtin_confidence_is_floored() {
    let history = vec![(false, 10.0); 200];
    let agent = agent_with("builtin.a", AgentKind::Builtin, 0.2, &history);
    assert!(approx(scoring::confidence(&agent), 0.9));
}

// ── Intent ─────────────────────────────────────────────────────────

#[rstest]
#[case("Send an email to Sam", types::EMAIL_SEND)]
#[case("schedule a meeting", types::CALENDAR_BOOK)]
#[case("please translate this", types::TEXT_TRANSLATE)]
#[case("turn off the lights", types::HOME_LIGHTS)]
fn keywords_select_candidate_types(
    #[case] raw: &str,
    #[case] expected: crate::capability::CapabilityType,
) {
    let intent = Intent::parse(raw);
    assert!(intent.is_candidate(&expected));
}

#[rstest]
fn candidate_capabilities_are_fully_relevant() {
    let intent = Intent::parse("email the team");
    let capability = catalog::resolve(&types::EMAIL_SEND).expect("known type");
    assert!(approx(intent.relevance(&capability), 1.0));
}

#[rstest]
fn non_candidates_score_half_the_word_overlap() {
    let intent = Intent::parse("convert currency rates");
    let capability = Capability::new(
        types::DATA_TRANSFORM,
        "Currency converter",
        "Converts currency amounts using live rates",
    );
    // "convert", "currency" and "rates" all appear: 3/3 * 0.5
    assert!(approx(intent.relevance(&capability), 0.5));
}

#[rstest]
fn short_words_do_not_count_towards_overlap() {
    let intent = Intent::parse("do it now");
    let capability = Capability::new(types::DATA_TRANSFORM, "do it now", "now");
    assert!(approx(intent.relevance(&capability), 0.0));
}

// ── Index ──────────────────────────────────────────────────────────

#[rstest]
fn index_skips_inactive_agents() {
    let active = agent_with("remote.a", AgentKind::Remote, 0.5, &[]);
    let mut inactive = agent_with("remote.b", AgentKind::Remote, 0.5, &[]);
    inactive.set_status(AgentStatus::Inactive, &DefaultClock);

    let index = CapabilityIndex::build(&[active.clone(), inactive], Instant::now());

    assert_eq!(index.agents_for(&types::WEB_SEARCH), [active.id().clone()]);
    assert!(index.agents_for(&types::EMAIL_SEND).is_empty());
}

#[rstest]
fn index_staleness_follows_ttl() {
    let built = Instant::now();
    let index = CapabilityIndex::build(&[], built);
    let ttl = Duration::from_secs(300);

    assert!(CapabilityIndex::default().is_stale(ttl, built));
    assert!(!index.is_stale(ttl, built));
    assert!(index.is_stale(ttl, built + ttl));
    assert!(index.is_stale(Duration::ZERO, built));
}
