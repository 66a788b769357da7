//! When steps for service discovery BDD scenarios.

use super::world::{DiscoveryWorld, local_service, run_async};
use rstest_bdd_macros::when;

#[when(r#"service "{name}" is resolved"#)]
fn resolve_service(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let result = run_async(world.agent()?.resolve(&name));
    world.last_resolve = Some(result);
    Ok(())
}

#[when(r#"service "{name}" is resolved twice"#)]
fn resolve_service_twice(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let agent = world.agent()?;
    run_async(agent.resolve(&name)).map_err(|err| eyre::eyre!("first lookup failed: {err}"))?;
    let result = run_async(agent.resolve(&name));
    world.last_resolve = Some(result);
    Ok(())
}

#[when("{seconds:i64} seconds pass")]
fn time_passes(world: &mut DiscoveryWorld, seconds: i64) {
    world.clock.advance_secs(seconds);
}

#[when("the discovery server becomes unreachable")]
fn server_unreachable(world: &mut DiscoveryWorld) {
    world.transport.fail_listing("connection refused");
    world.transport.fail_registration("connection refused");
}

#[when(r#"service "{name}" is registered"#)]
fn register_service(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let result = run_async(world.agent()?.force_register(&local_service(&name)));
    world.last_registration = Some(result);
    Ok(())
}

#[when(r#"service "{name}" is ensured registered twice"#)]
fn ensure_registered_twice(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let agent = world.agent()?;
    let service = local_service(&name);
    for _ in 0..2 {
        let registered = run_async(agent.ensure_registered(&service))
            .map_err(|err| eyre::eyre!("registration failed: {err}"))?;
        if !registered {
            return Err(eyre::eyre!("expected '{name}' to be registered"));
        }
    }
    Ok(())
}
