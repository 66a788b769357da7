//! Transport port for the discovery server.

use crate::discovery::domain::{Service, Ttl};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Network contract against a discovery endpoint.
///
/// Implementations own every wire concern (encoding, timeouts, TLS). The
/// agent only inspects the returned envelopes.
#[async_trait]
pub trait DirectoryTransport: Send + Sync {
    /// Fetches the current service listing from `address`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the server cannot be reached or the
    /// response body is not a valid envelope.
    async fn list_services(&self, address: &str) -> TransportResult<ListingResponse>;

    /// Registers `service` with the discovery server at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the server cannot be reached or the
    /// response body is not a valid envelope.
    async fn register(
        &self,
        address: &str,
        service: &Service,
    ) -> TransportResult<RegistrationResponse>;
}

/// Envelope returned by a listing request.
///
/// `data` is left opaque; a [`ResponseReader`](super::ResponseReader) decides
/// how to turn it into services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListingResponse {
    /// Whether the server handled the request.
    #[serde(alias = "isSuccess")]
    pub is_success: bool,
    /// Opaque listing payload.
    #[serde(alias = "data")]
    pub data: Value,
    /// Free-text diagnostic message.
    #[serde(alias = "message")]
    pub message: String,
    /// Numeric status code chosen by the server.
    #[serde(alias = "code")]
    pub code: i64,
}

impl ListingResponse {
    /// Creates a successful listing carrying `services`.
    #[must_use]
    pub fn with_services(services: &[Service]) -> Self {
        let data = services
            .iter()
            .map(|service| {
                json!({
                    "Name": service.name(),
                    "Host": service.host(),
                    "Port": service.port(),
                })
            })
            .collect();
        Self {
            is_success: true,
            data: Value::Array(data),
            message: String::new(),
            code: 200,
        }
    }

    /// Creates an unsuccessful listing response.
    #[must_use]
    pub fn rejected(code: i64, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            data: Value::Null,
            message: message.into(),
            code,
        }
    }
}

/// Envelope returned by a registration request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RegistrationResponse {
    /// Whether the server accepted the registration.
    #[serde(alias = "isSuccess")]
    pub is_success: bool,
    /// Opaque payload; the renewal TTL on success.
    #[serde(alias = "data")]
    pub data: Value,
    /// Free-text diagnostic message.
    #[serde(alias = "message")]
    pub message: String,
    /// Numeric status code chosen by the server.
    #[serde(alias = "code")]
    pub code: i64,
}

impl RegistrationResponse {
    /// Creates an accepted registration that asks for renewal after `ttl`.
    #[must_use]
    pub fn accepted(ttl: Ttl) -> Self {
        Self {
            is_success: true,
            data: Value::from(ttl.as_secs()),
            message: String::new(),
            code: 200,
        }
    }

    /// Creates a rejected registration.
    #[must_use]
    pub fn rejected(code: i64, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            data: Value::Null,
            message: message.into(),
            code,
        }
    }
}

/// Errors returned by transport adapters.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request could not be sent or no response arrived.
    #[error("unable to send request: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),

    /// A response arrived but its body is not a valid envelope.
    #[error("unable to parse response: {0}")]
    MalformedBody(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wraps a send failure.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }

    /// Wraps a body parsing failure.
    pub fn malformed_body(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::MalformedBody(Arc::new(err))
    }
}
