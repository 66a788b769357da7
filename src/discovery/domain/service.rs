//! Registrable service endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a registrable endpoint.
///
/// Two services are the same registration when their names match; host and
/// port are carried along so the discovery server can route to the
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "Name", alias = "name")]
    name: String,
    #[serde(rename = "Host", alias = "host")]
    host: String,
    #[serde(rename = "Port", alias = "port")]
    port: String,
}

impl Service {
    /// Creates a service endpoint description.
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: port.into(),
        }
    }

    /// Returns the service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the host the service listens on.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port the service listens on.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.host, self.port)
    }
}
