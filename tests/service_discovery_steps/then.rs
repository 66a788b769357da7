//! Then steps for service discovery BDD scenarios.

use super::world::{DiscoveryWorld, local_service, run_async};
use discoverer::discovery::{
    ports::TransportError,
    services::{DirectoryCacheError, DiscoveryError},
};
use rstest_bdd_macros::then;

#[then(r#"the resolved service has host "{host}" and port "{port}""#)]
fn resolved_service_matches(
    world: &DiscoveryWorld,
    host: String,
    port: String,
) -> Result<(), eyre::Report> {
    let service = world
        .last_resolve
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing lookup result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?;
    if service.host() != host || service.port() != port {
        return Err(eyre::eyre!("unexpected endpoint {service}"));
    }
    Ok(())
}

#[then("the directory was fetched {count:usize} times")]
fn directory_fetch_count(world: &DiscoveryWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.transport.list_calls();
    if calls != count {
        return Err(eyre::eyre!("expected {count} listing requests, found {calls}"));
    }
    Ok(())
}

#[then("the lookup fails with a not found error")]
fn lookup_not_found(world: &DiscoveryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_resolve
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing lookup result in scenario world"))?;
    if !matches!(result, Err(DiscoveryError::NotFound { .. })) {
        return Err(eyre::eyre!("expected not found error, got {result:?}"));
    }
    Ok(())
}

#[then("the lookup fails with a transport error")]
fn lookup_transport_error(world: &DiscoveryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_resolve
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing lookup result in scenario world"))?;
    if !matches!(
        result,
        Err(DiscoveryError::Lookup {
            source: DirectoryCacheError::Transport(TransportError::Request(_)),
            ..
        })
    ) {
        return Err(eyre::eyre!("expected transport error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the cached directory still lists "{name}""#)]
fn cache_still_lists(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let listing = run_async(world.agent()?.cached_services());
    if listing.find(&name).is_none() {
        return Err(eyre::eyre!("expected cached directory to list '{name}'"));
    }
    Ok(())
}

#[then("the registration succeeded")]
fn registration_succeeded(world: &DiscoveryWorld) -> Result<(), eyre::Report> {
    match world.last_registration {
        Some(Ok(true)) => Ok(()),
        ref other => Err(eyre::eyre!("expected accepted registration, got {other:?}")),
    }
}

#[then("the registration was refused")]
fn registration_refused(world: &DiscoveryWorld) -> Result<(), eyre::Report> {
    match world.last_registration {
        Some(Ok(false)) => Ok(()),
        ref other => Err(eyre::eyre!("expected refused registration, got {other:?}")),
    }
}

#[then("the agent TTL is {seconds:u64} seconds")]
fn agent_ttl_is(world: &DiscoveryWorld, seconds: u64) -> Result<(), eyre::Report> {
    let ttl = world.agent()?.ttl();
    if ttl.as_secs() != seconds {
        return Err(eyre::eyre!("expected TTL {seconds}s, found {ttl}"));
    }
    Ok(())
}

#[then(r#"service "{name}" is registered with the agent"#)]
fn service_registered(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    if !world.agent()?.is_registered(&local_service(&name)) {
        return Err(eyre::eyre!("expected '{name}' to be registered"));
    }
    Ok(())
}

#[then(r#"service "{name}" is not registered with the agent"#)]
fn service_not_registered(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    if world.agent()?.is_registered(&local_service(&name)) {
        return Err(eyre::eyre!("expected '{name}' to stay unregistered"));
    }
    Ok(())
}

#[then("the server received {count:usize} registrations")]
fn registration_count(world: &DiscoveryWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.transport.register_calls();
    if calls != count {
        return Err(eyre::eyre!("expected {count} registrations, found {calls}"));
    }
    Ok(())
}
