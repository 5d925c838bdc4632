//! In-memory integration tests for the execution engine.

use std::time::Duration;

use crate::in_memory::helpers::{EngineHarness, engine_with, wait_for_terminal};
use conductor::agent_registry::domain::AgentId;
use conductor::capability::{ParameterValue, Parameters, types};
use conductor::execution::{
    domain::{ExecutionContext, ExecutionRequest, ExecutionStatus, ExecutionStep, ResultQuery},
    services::{EngineConfig, ExecutionError, ExecutionScope},
};
use rstest::rstest;

fn summarize(text: &str) -> ExecutionRequest {
    ExecutionRequest::new(types::TEXT_SUMMARIZE)
        .with_parameter("text", text)
        .asynchronous()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queued_requests_drain_across_workers() {
    let EngineHarness {
        engine, handler, ..
    } = engine_with(EngineConfig::responsive()).await;
    handler
        .delay(types::TEXT_SUMMARIZE, Duration::from_millis(20))
        .expect("script delay");
    engine.start().expect("engine starts");
    let scope = ExecutionScope::background();

    let mut ids = Vec::new();
    for index in 0..6 {
        let pending = engine
            .execute(summarize(&format!("document {index}")), &scope)
            .await
            .expect("request queued");
        ids.push(pending.id());
    }
    for id in ids {
        let finished = wait_for_terminal(&engine, id).await;
        assert_eq!(finished.status(), ExecutionStatus::Completed);
    }

    let agent = engine
        .registry()
        .get(&AgentId::new("builtin.text").expect("valid agent id"))
        .expect("agent registered");
    assert_eq!(agent.total_calls(), 6);
    assert!(agent.avg_latency_ms() > 0.0);
    engine.stop().await.expect("engine stops");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queued_work_waits_for_a_restart() {
    let EngineHarness { engine, .. } = engine_with(EngineConfig::responsive()).await;
    engine.start().expect("engine starts");
    engine.stop().await.expect("engine stops");

    let pending = engine
        .execute(summarize("held"), &ExecutionScope::background())
        .await
        .expect("request queued");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        engine
            .get_result(pending.id())
            .await
            .expect("result stored")
            .status(),
        ExecutionStatus::Pending
    );

    engine.start().expect("engine restarts");
    let finished = wait_for_terminal(&engine, pending.id()).await;
    assert_eq!(finished.status(), ExecutionStatus::Completed);
    engine.stop().await.expect("engine stops");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queued_request_with_invalid_parameters_fails_on_the_worker() {
    let EngineHarness {
        engine, handler, ..
    } = engine_with(EngineConfig::responsive()).await;
    engine.start().expect("engine starts");

    let pending = engine
        .execute(
            ExecutionRequest::new(types::TEXT_SUMMARIZE).asynchronous(),
            &ExecutionScope::background(),
        )
        .await
        .expect("request queued");

    let finished = wait_for_terminal(&engine, pending.id()).await;
    assert_eq!(finished.status(), ExecutionStatus::Failed);
    assert!(finished
        .error()
        .is_some_and(|error| error.contains("missing required parameter")));
    assert!(handler.invocations().expect("invocations readable").is_empty());
    engine.stop().await.expect("engine stops");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scope_cancellation_reaches_queued_work() {
    let EngineHarness {
        engine, handler, ..
    } = engine_with(EngineConfig::responsive()).await;
    handler
        .delay(types::TEXT_SUMMARIZE, Duration::from_secs(5))
        .expect("script delay");
    engine.start().expect("engine starts");
    let (scope, cancel) = ExecutionScope::cancellable();

    let pending = engine
        .execute(summarize("slow"), &scope)
        .await
        .expect("request queued");
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let finished = wait_for_terminal(&engine, pending.id()).await;
    assert_eq!(finished.status(), ExecutionStatus::Canceled);
    engine.stop().await.expect("engine stops");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn chain_outputs_are_collected_in_order() {
    let EngineHarness {
        engine, handler, ..
    } = engine_with(EngineConfig::responsive()).await;
    handler
        .respond_with(types::WEB_SEARCH, ParameterValue::from("three results"))
        .expect("script output");

    let chain = engine
        .execute_chain(
            vec![
                ExecutionStep::new(types::WEB_SEARCH).with_parameter("query", "tokio"),
                ExecutionStep::new(types::TEXT_SUMMARIZE)
                    .with_parameters(Parameters::new().with("text", "three results"))
                    .depends_on(0),
            ],
            ExecutionContext::default().with_user("u-7"),
            &ExecutionScope::background(),
        )
        .await
        .expect("chain completes");

    let outputs: Vec<Option<&ParameterValue>> =
        chain.results().iter().map(|result| result.output()).collect();
    assert_eq!(outputs.len(), 2);
    assert_eq!(
        outputs.first().copied().flatten(),
        Some(&ParameterValue::from("three results"))
    );
    assert!(chain.completed_at().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_results_are_listed_by_status() {
    let EngineHarness {
        engine, handler, ..
    } = engine_with(EngineConfig::single_attempt()).await;
    handler
        .fail_always(types::WEB_SEARCH)
        .expect("script failures");

    let err = engine
        .execute(
            ExecutionRequest::new(types::WEB_SEARCH).with_parameter("query", "x"),
            &ExecutionScope::background(),
        )
        .await
        .expect_err("search always fails");
    let failed_id = err.result().map(|result| result.id());
    assert!(matches!(err, ExecutionError::Terminated { .. }));

    let mut listed = Vec::new();
    for _ in 0..100 {
        listed = engine
            .list_results(ResultQuery::default().with_status(ExecutionStatus::Failed))
            .await
            .expect("listing succeeds");
        if !listed.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(listed.first().map(|result| result.id()), failed_id);
}
