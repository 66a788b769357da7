//! Given steps for service discovery BDD scenarios.

use super::world::DiscoveryWorld;
use discoverer::discovery::{
    domain::{Service, Ttl},
    ports::RegistrationResponse,
};
use rstest_bdd_macros::given;

#[given(r#"a discovery server listing service "{name}" at "{host}" port "{port}""#)]
fn server_listing(world: &mut DiscoveryWorld, name: String, host: String, port: String) {
    world
        .transport
        .set_services(&[Service::new(name, host, port)]);
}

#[given("a discovery server that accepts registrations with a TTL of {seconds:u64} seconds")]
fn server_accepting(world: &mut DiscoveryWorld, seconds: u64) {
    world
        .transport
        .set_registration_response(RegistrationResponse::accepted(Ttl::from_secs(seconds)));
}

#[given("a discovery server that rejects registrations")]
fn server_rejecting(world: &mut DiscoveryWorld) {
    world
        .transport
        .set_registration_response(RegistrationResponse::rejected(400, "registration refused"));
}

#[given("an agent with a TTL of {seconds:u64} seconds")]
fn agent_with_ttl(world: &mut DiscoveryWorld, seconds: u64) {
    world.build_agent(Ttl::from_secs(seconds));
}
