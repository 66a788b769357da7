//! Application services for service discovery.

mod agent;
mod default_agent;
mod directory_cache;
mod renewal;

pub use agent::{DiscoveryAgent, DiscoveryError, DiscoveryResult, HttpDiscoveryAgent};
pub use default_agent::{AgentSlot, DEFAULT_AGENT};
pub use directory_cache::{DirectoryCache, DirectoryCacheError, DirectoryCacheResult};
pub use renewal::{MIN_RENEWAL_INTERVAL, RenewalErrorSink, RenewalFailure, TracingErrorSink};
