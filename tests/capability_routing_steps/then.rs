//! Then steps for capability routing BDD scenarios.

use super::world::{RoutingWorld, capability};
use conductor::agent_registry::domain::{AgentId, AgentStatus};
use conductor::capability::ParameterError;
use conductor::execution::{
    domain::{ExecutionResult, ExecutionStatus},
    services::ExecutionError,
};
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn last_result(world: &RoutingWorld) -> Result<&ExecutionResult, eyre::Report> {
    match world.last_execution.as_ref() {
        Some(Ok(result)) => Ok(result),
        Some(Err(err)) => Err(eyre::eyre!("execution failed: {err}")),
        None => Err(eyre::eyre!("no execution in scenario world")),
    }
}

#[then(r#"the execution completes on agent "{agent}""#)]
fn execution_completes_on(world: &RoutingWorld, agent: String) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if result.status() != ExecutionStatus::Completed {
        return Err(eyre::eyre!("expected completed, got {}", result.status()));
    }
    if result.agent_id().map(AgentId::as_str) != Some(agent.as_str()) {
        return Err(eyre::eyre!(
            "expected agent '{agent}', got {:?}",
            result.agent_id()
        ));
    }
    Ok(())
}

#[then(r#"agent "{agent}" has recorded {count:u64} call"#)]
fn agent_recorded_calls(
    world: &RoutingWorld,
    agent: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let id = AgentId::new(agent).wrap_err("parse agent id")?;
    let stored = world.engine.registry().get(&id).wrap_err("lookup agent")?;
    if stored.total_calls() != count {
        return Err(eyre::eyre!(
            "expected {count} calls, found {}",
            stored.total_calls()
        ));
    }
    Ok(())
}

#[then("the execution reports {retries:u32} retries")]
fn execution_reports_retries(world: &RoutingWorld, retries: u32) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if result.metrics().retry_count != retries {
        return Err(eyre::eyre!(
            "expected {retries} retries, found {}",
            result.metrics().retry_count
        ));
    }
    Ok(())
}

#[then(r#"the best match is agent "{agent}""#)]
fn best_match_is(world: &RoutingWorld, agent: String) -> Result<(), eyre::Report> {
    let best = world
        .last_match
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no discovery in scenario world"))?;
    if best.agent_id().as_str() != agent {
        return Err(eyre::eyre!(
            "expected '{agent}', got '{}'",
            best.agent_id()
        ));
    }
    Ok(())
}

#[then(r#"the request is rejected for missing parameter "{parameter}""#)]
fn rejected_for_missing(world: &RoutingWorld, parameter: String) -> Result<(), eyre::Report> {
    let outcome = world
        .last_execution
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no execution in scenario world"))?;
    let rejected = matches!(
        outcome,
        Err(ExecutionError::InvalidParameters(ParameterError::Missing { parameter: missing }))
            if *missing == parameter
    );
    if !rejected {
        return Err(eyre::eyre!("expected missing '{parameter}', got {outcome:?}"));
    }
    Ok(())
}

#[then("no agent was invoked")]
fn no_agent_invoked(world: &RoutingWorld) -> Result<(), eyre::Report> {
    let invocations = world.handler.invocations().wrap_err("read invocations")?;
    if !invocations.is_empty() {
        return Err(eyre::eyre!("expected no invocations, found {}", invocations.len()));
    }
    Ok(())
}

#[then("the chain fails at step {step:usize}")]
fn chain_fails_at(world: &RoutingWorld, step: usize) -> Result<(), eyre::Report> {
    let outcome = world
        .last_chain
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no chain in scenario world"))?;
    match outcome {
        Err(ExecutionError::ChainFailed {
            step: failed,
            chain,
            ..
        }) if *failed == step && chain.status() == ExecutionStatus::Failed => Ok(()),
        other => Err(eyre::eyre!("expected failure at step {step}, got {other:?}")),
    }
}

#[then(r#""{capability_type}" was never invoked"#)]
fn never_invoked(world: &RoutingWorld, capability_type: String) -> Result<(), eyre::Report> {
    let count = world
        .handler
        .invocation_count(&capability(&capability_type)?)
        .wrap_err("read invocations")?;
    if count != 0 {
        return Err(eyre::eyre!("expected no calls to {capability_type}, found {count}"));
    }
    Ok(())
}

#[then(r#"agent "{agent}" has status "{status}""#)]
fn agent_has_status(world: &RoutingWorld, agent: String, status: String) -> Result<(), eyre::Report> {
    let id = AgentId::new(agent).wrap_err("parse agent id")?;
    let expected = AgentStatus::try_from(status.as_str()).wrap_err("parse status")?;
    let stored = world.engine.registry().get(&id).wrap_err("lookup agent")?;
    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    if world.last_health == Some(true) && expected == AgentStatus::Error {
        return Err(eyre::eyre!("probe reported healthy but agent is in error"));
    }
    Ok(())
}
