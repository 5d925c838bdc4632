//! Given steps for capability routing BDD scenarios.

use super::world::{RoutingWorld, capability, run_async};
use conductor::agent_registry::domain::AgentId;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("the built-in agents are registered")]
fn builtin_agents_registered(world: &mut RoutingWorld) -> Result<(), eyre::Report> {
    run_async(world.engine.registry().register_builtin_agents())
        .wrap_err("register built-in agents")?;
    Ok(())
}

#[given(r#""{capability_type}" fails {times:u32} times before succeeding"#)]
fn capability_fails_times(
    world: &mut RoutingWorld,
    capability_type: String,
    times: u32,
) -> Result<(), eyre::Report> {
    world
        .handler
        .fail_times(capability(&capability_type)?, times)
        .wrap_err("script transient failures")?;
    Ok(())
}

#[given(r#""{capability_type}" always fails"#)]
fn capability_always_fails(
    world: &mut RoutingWorld,
    capability_type: String,
) -> Result<(), eyre::Report> {
    world
        .handler
        .fail_always(capability(&capability_type)?)
        .wrap_err("script permanent failure")?;
    Ok(())
}

#[given(r#"agent "{agent}" reports unhealthy"#)]
fn agent_reports_unhealthy(world: &mut RoutingWorld, agent: String) -> Result<(), eyre::Report> {
    let id = AgentId::new(agent).wrap_err("parse agent id")?;
    world
        .handler
        .set_unhealthy(id)
        .wrap_err("script unhealthy probe")?;
    Ok(())
}
