//! Unit tests for execution domain types.

use crate::agent_registry::domain::AgentId;
use crate::capability::{ParameterValue, Parameters, types};
use crate::execution::domain::{
    ChainExecution, ExecutionContext, ExecutionDomainError, ExecutionRequest, ExecutionResult,
    ExecutionStatus, ExecutionStep, Priority, ResultQuery, DEFAULT_QUERY_LIMIT,
};
use mockable::DefaultClock;
use rstest::rstest;
use std::time::Duration;
use uuid::Uuid;

fn agent_id() -> AgentId {
    AgentId::new("builtin.text").expect("valid agent id")
}

#[rstest]
#[case(ExecutionStatus::Pending, ExecutionStatus::Running, true)]
#[case(ExecutionStatus::Pending, ExecutionStatus::Canceled, true)]
#[case(ExecutionStatus::Pending, ExecutionStatus::Failed, true)]
#[case(ExecutionStatus::Pending, ExecutionStatus::Completed, false)]
#[case(ExecutionStatus::Running, ExecutionStatus::Completed, true)]
#[case(ExecutionStatus::Running, ExecutionStatus::Timeout, true)]
#[case(ExecutionStatus::Running, ExecutionStatus::Pending, false)]
#[case(ExecutionStatus::Completed, ExecutionStatus::Failed, false)]
#[case(ExecutionStatus::Canceled, ExecutionStatus::Running, false)]
#[case(ExecutionStatus::Timeout, ExecutionStatus::Completed, false)]
fn status_transitions(
    #[case] from: ExecutionStatus,
    #[case] to: ExecutionStatus,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[rstest]
#[case(ExecutionStatus::Pending, false)]
#[case(ExecutionStatus::Running, false)]
#[case(ExecutionStatus::Completed, true)]
#[case(ExecutionStatus::Failed, true)]
#[case(ExecutionStatus::Timeout, true)]
#[case(ExecutionStatus::Canceled, true)]
fn terminal_statuses(#[case] status: ExecutionStatus, #[case] terminal: bool) {
    assert_eq!(status.is_terminal(), terminal);
}

#[rstest]
#[case("pending", ExecutionStatus::Pending)]
#[case("timeout", ExecutionStatus::Timeout)]
#[case("canceled", ExecutionStatus::Canceled)]
fn status_parses_storage_form(#[case] raw: &str, #[case] expected: ExecutionStatus) {
    assert_eq!(ExecutionStatus::try_from(raw).expect("known status"), expected);
    assert_eq!(expected.as_str(), raw);
}

#[rstest]
fn unknown_status_is_rejected() {
    assert!(ExecutionStatus::try_from("paused").is_err());
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(5, true)]
#[case(6, false)]
fn priority_accepts_one_to_five(#[case] value: u8, #[case] valid: bool) {
    let result = Priority::new(value);
    assert_eq!(result.is_ok(), valid);
    if !valid {
        assert_eq!(result, Err(ExecutionDomainError::InvalidPriority(value)));
    }
}

#[rstest]
fn priority_defaults_to_normal() {
    assert_eq!(Priority::default(), Priority::NORMAL);
    assert_eq!(Priority::NORMAL.value(), 3);
}

#[rstest]
fn priority_rejects_out_of_range_json() {
    assert!(serde_json::from_str::<Priority>("9").is_err());
    let parsed: Priority = serde_json::from_str("5").expect("valid priority");
    assert_eq!(parsed, Priority::LOWEST);
}

#[rstest]
fn priority_one_is_highest() {
    assert_eq!(Priority::HIGHEST.value(), 1);
    assert_eq!(Priority::LOWEST.value(), 5);
    assert_eq!(Priority::new(1), Ok(Priority::HIGHEST));
}

#[rstest]
fn request_builder_records_options() {
    let parent = Uuid::new_v4();
    let request = ExecutionRequest::new(types::TEXT_SUMMARIZE)
        .for_agent(agent_id())
        .with_parameter("text", "long text")
        .with_context(ExecutionContext::default().with_user("u-1").with_parent(parent))
        .with_timeout(Duration::from_secs(5))
        .with_priority(Priority::HIGHEST)
        .with_max_retries(1)
        .asynchronous();

    assert_eq!(request.agent_id(), Some(&agent_id()));
    assert_eq!(
        request.parameters().get("text"),
        Some(&ParameterValue::from("long text"))
    );
    assert_eq!(request.context().user_id.as_deref(), Some("u-1"));
    assert_eq!(request.context().parent_execution_id, Some(parent));
    assert_eq!(request.timeout(), Some(Duration::from_secs(5)));
    assert_eq!(request.priority(), Priority::HIGHEST);
    assert_eq!(request.max_retries(), Some(1));
    assert!(request.is_async());
}

#[rstest]
fn request_defaults_are_engine_defaults() {
    let request = ExecutionRequest::new(types::WEB_SEARCH);

    assert!(request.agent_id().is_none());
    assert!(request.timeout().is_none());
    assert!(request.max_retries().is_none());
    assert!(!request.is_async());
    assert_eq!(request.priority(), Priority::NORMAL);
}

#[rstest]
fn result_lifecycle_records_timestamps() {
    let clock = DefaultClock;
    let request = ExecutionRequest::new(types::TEXT_GENERATE);
    let mut result = ExecutionResult::pending(&request, &clock);
    assert_eq!(result.status(), ExecutionStatus::Pending);
    assert_eq!(result.request_id(), request.id());
    assert!(result.started_at().is_none());

    result.start(agent_id(), &clock).expect("pending result starts");
    assert_eq!(result.status(), ExecutionStatus::Running);
    assert_eq!(result.agent_id(), Some(&agent_id()));

    result
        .complete(ParameterValue::from("done"), &clock)
        .expect("running result completes");
    assert_eq!(result.status(), ExecutionStatus::Completed);
    assert_eq!(result.output(), Some(&ParameterValue::from("done")));
    let started = result.started_at().expect("started timestamp");
    let completed = result.completed_at().expect("completed timestamp");
    assert!(completed >= started);
    assert!(result.duration().is_some());
}

#[rstest]
fn terminal_result_rejects_further_transitions() {
    let clock = DefaultClock;
    let mut result = ExecutionResult::pending(&ExecutionRequest::new(types::TEXT_GENERATE), &clock);
    result
        .end_with(ExecutionStatus::Canceled, "canceled", &clock)
        .expect("pending result cancels");

    let err = result
        .start(agent_id(), &clock)
        .expect_err("canceled result must not start");

    assert_eq!(
        err,
        ExecutionDomainError::InvalidTransition {
            from: ExecutionStatus::Canceled,
            to: ExecutionStatus::Running,
        }
    );
    assert_eq!(result.error(), Some("canceled"));
}

#[rstest]
fn end_with_rejects_success_status() {
    let clock = DefaultClock;
    let mut result = ExecutionResult::pending(&ExecutionRequest::new(types::TEXT_GENERATE), &clock);
    result.start(agent_id(), &clock).expect("pending result starts");

    assert!(result
        .end_with(ExecutionStatus::Completed, "not a failure", &clock)
        .is_err());
    assert_eq!(result.status(), ExecutionStatus::Running);
}

#[rstest]
fn chain_tracks_steps_and_outcome() {
    let clock = DefaultClock;
    let steps = vec![
        ExecutionStep::new(types::WEB_SEARCH).with_parameter("query", "rust"),
        ExecutionStep::new(types::TEXT_SUMMARIZE)
            .with_agent(agent_id())
            .depends_on(0),
    ];
    let mut chain = ChainExecution::new(steps, &clock);
    assert_eq!(chain.status(), ExecutionStatus::Pending);
    assert_eq!(chain.steps().len(), 2);
    assert_eq!(
        chain.steps().get(1).map(ExecutionStep::dependencies),
        Some([0_usize].as_slice())
    );

    chain.start().expect("chain starts");
    chain.record_step(ExecutionResult::pending(
        &ExecutionRequest::new(types::WEB_SEARCH),
        &clock,
    ));
    assert_eq!(chain.current_step(), 1);
    chain.record_failed_step(ExecutionResult::pending(
        &ExecutionRequest::new(types::TEXT_SUMMARIZE),
        &clock,
    ));
    assert_eq!(chain.current_step(), 1);
    assert_eq!(chain.results().len(), 2);

    chain.fail("step 1 failed", &clock).expect("running chain fails");
    assert_eq!(chain.status(), ExecutionStatus::Failed);
    assert_eq!(chain.error(), Some("step 1 failed"));
    assert!(chain.completed_at().is_some());
    assert!(chain.complete(&clock).is_err());
}

#[rstest]
fn step_parameters_replace_wholesale() {
    let parameters = Parameters::new().with("query", "tokio");
    let step = ExecutionStep::new(types::WEB_SEARCH)
        .with_parameter("stale", true)
        .with_parameters(parameters.clone());

    assert_eq!(step.parameters(), &parameters);
    assert!(step.agent_id().is_none());
}

#[rstest]
fn result_query_defaults() {
    let query = ResultQuery::default();
    assert_eq!(query.limit(), DEFAULT_QUERY_LIMIT);
    assert!(query.status().is_none());

    let filtered = ResultQuery::recent(5).with_status(ExecutionStatus::Failed);
    assert_eq!(filtered.limit(), 5);
    assert_eq!(filtered.status(), Some(ExecutionStatus::Failed));
}
