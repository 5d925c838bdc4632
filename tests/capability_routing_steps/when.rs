//! When steps for capability routing BDD scenarios.

use super::world::{RoutingWorld, capability, run_async};
use conductor::agent_registry::domain::AgentId;
use conductor::capability::types;
use conductor::discovery::domain::CapabilityRequest;
use conductor::execution::{
    domain::{ExecutionContext, ExecutionRequest, ExecutionStep},
    services::ExecutionScope,
};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#""{capability_type}" is executed with text "{text}""#)]
fn execute_with_text(
    world: &mut RoutingWorld,
    capability_type: String,
    text: String,
) -> Result<(), eyre::Report> {
    let request = ExecutionRequest::new(capability(&capability_type)?).with_parameter("text", text);
    world.last_execution = Some(run_async(
        world.engine.execute(request, &ExecutionScope::background()),
    ));
    Ok(())
}

#[when(r#""{capability_type}" is executed without parameters"#)]
fn execute_without_parameters(
    world: &mut RoutingWorld,
    capability_type: String,
) -> Result<(), eyre::Report> {
    let request = ExecutionRequest::new(capability(&capability_type)?);
    world.last_execution = Some(run_async(
        world.engine.execute(request, &ExecutionScope::background()),
    ));
    Ok(())
}

#[when(r#"the intent "{intent}" is discovered"#)]
fn discover_intent(world: &mut RoutingWorld, intent: String) -> Result<(), eyre::Report> {
    let best = world
        .engine
        .discovery()
        .discover_best(&CapabilityRequest::for_intent(intent))
        .wrap_err("discover intent")?;
    world.last_match = Some(best);
    Ok(())
}

#[when("a chain of web search, summary and email runs")]
fn run_search_summary_email_chain(world: &mut RoutingWorld) {
    let steps = vec![
        ExecutionStep::new(types::WEB_SEARCH).with_parameter("query", "quarterly numbers"),
        ExecutionStep::new(types::TEXT_SUMMARIZE)
            .with_parameter("text", "search results")
            .depends_on(0),
        ExecutionStep::new(types::EMAIL_SEND)
            .with_parameter("to", "team@example.com")
            .with_parameter("subject", "Summary")
            .with_parameter("body", "See below")
            .depends_on(1),
    ];
    world.last_chain = Some(run_async(world.engine.execute_chain(
        steps,
        ExecutionContext::default(),
        &ExecutionScope::background(),
    )));
}

#[when(r#"agent "{agent}" is health checked"#)]
fn health_check_agent(world: &mut RoutingWorld, agent: String) -> Result<(), eyre::Report> {
    let id = AgentId::new(agent).wrap_err("parse agent id")?;
    let healthy = run_async(world.engine.check_health(&id)).wrap_err("health check")?;
    world.last_health = Some(healthy);
    Ok(())
}
