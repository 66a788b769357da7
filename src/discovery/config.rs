//! Agent configuration.

use crate::discovery::{domain::Ttl, ports::TransportError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Settings used to build a discovery agent.
///
/// # Examples
///
/// ```
/// use discoverer::discovery::config::AgentConfig;
///
/// let config = AgentConfig::from_json_str(r#"{"address": "http://registry:8500"}"#)
///     .expect("valid configuration");
/// assert_eq!(config.ttl_seconds, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Discovery server endpoint.
    pub address: String,
    /// TTL applied until the server grants its own.
    pub ttl_seconds: u64,
    /// Per-request timeout for the HTTP transport.
    pub request_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            ttl_seconds: 60,
            request_timeout_secs: 10,
        }
    }
}

impl AgentConfig {
    /// Creates a configuration for `address` with default timings.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`AgentConfigError::Parse`] for malformed JSON and
    /// [`AgentConfigError::MissingAddress`] when no address is given.
    pub fn from_json_str(raw: &str) -> Result<Self, AgentConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| AgentConfigError::Parse(Arc::new(err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can build an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentConfigError::MissingAddress`] when the address is blank.
    pub fn validate(&self) -> Result<(), AgentConfigError> {
        if self.address.trim().is_empty() {
            return Err(AgentConfigError::MissingAddress);
        }
        Ok(())
    }

    /// Returns the initial TTL.
    #[must_use]
    pub const fn ttl(&self) -> Ttl {
        Ttl::from_secs(self.ttl_seconds)
    }

    /// Returns the HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Errors returned while loading configuration or building an agent from it.
#[derive(Debug, Clone, Error)]
pub enum AgentConfigError {
    /// No discovery server address was configured.
    #[error("discovery server address must not be empty")]
    MissingAddress,
    /// The configuration document is not valid JSON for this shape.
    #[error("invalid agent configuration: {0}")]
    Parse(Arc<serde_json::Error>),
    /// The transport could not be constructed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
