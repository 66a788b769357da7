//! Shared world state for service discovery BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use discoverer::discovery::{
    adapters::{InMemoryDirectoryTransport, JsonResponseReader, ManualClock},
    domain::{Service, Ttl},
    services::{DiscoveryAgent, DiscoveryResult},
};
use rstest::fixture;

/// Agent type used by the BDD world.
pub type TestAgent = DiscoveryAgent<InMemoryDirectoryTransport, JsonResponseReader, ManualClock>;

/// Scenario world for service discovery behaviour tests.
pub struct DiscoveryWorld {
    /// Scripted discovery server.
    pub transport: InMemoryDirectoryTransport,
    /// Clock shared with the agent.
    pub clock: ManualClock,
    /// Agent under test, built once the TTL is known.
    pub agent: Option<TestAgent>,
    /// Result of the last lookup.
    pub last_resolve: Option<DiscoveryResult<Service>>,
    /// Result of the last registration attempt.
    pub last_registration: Option<DiscoveryResult<bool>>,
}

impl DiscoveryWorld {
    /// Creates a world with an unconfigured server and no agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transport: InMemoryDirectoryTransport::new(),
            clock: ManualClock::new(scenario_start()),
            agent: None,
            last_resolve: None,
            last_registration: None,
        }
    }

    /// Builds the agent under test.
    pub fn build_agent(&mut self, ttl: Ttl) {
        self.agent = Some(DiscoveryAgent::new(
            "http://discovery.test",
            ttl,
            Arc::new(self.transport.clone()),
            Arc::new(JsonResponseReader::new()),
            Arc::new(self.clock.clone()),
        ));
    }

    /// Returns the agent, failing the step when none was built.
    pub fn agent(&self) -> Result<&TestAgent, eyre::Report> {
        self.agent
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no agent in scenario world"))
    }
}

impl Default for DiscoveryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DiscoveryWorld {
    DiscoveryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds the service a scenario registers under `name`.
pub fn local_service(name: &str) -> Service {
    Service::new(name, "127.0.0.1", "8080")
}

fn scenario_start() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + TimeDelta::days(20_000)
}
