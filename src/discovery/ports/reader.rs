//! Response reader port.

use super::transport::{ListingResponse, RegistrationResponse};
use crate::discovery::domain::{Service, Ttl};
use std::sync::Arc;
use thiserror::Error;

/// Result type for response extraction.
pub type ResponseDecodeResult<T> = Result<T, ResponseDecodeError>;

/// Extracts typed results from transport envelopes.
pub trait ResponseReader: Send + Sync {
    /// Returns the services carried by a listing response.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseDecodeError`] when the payload does not describe a
    /// list of services.
    fn extract_services(&self, response: &ListingResponse) -> ResponseDecodeResult<Vec<Service>>;

    /// Returns the renewal TTL granted by a registration response.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseDecodeError`] when the payload is not a
    /// non-negative number of seconds.
    fn extract_renewal_ttl(&self, response: &RegistrationResponse) -> ResponseDecodeResult<Ttl>;
}

/// Errors returned when a response payload has an unexpected shape.
#[derive(Debug, Clone, Error)]
pub enum ResponseDecodeError {
    /// The payload is valid JSON of the wrong shape.
    #[error("unexpected {field} payload: {reason}")]
    UnexpectedPayload {
        /// Which result was being extracted.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The payload could not be deserialized.
    #[error("unable to decode response data: {0}")]
    Deserialize(Arc<serde_json::Error>),
}

impl ResponseDecodeError {
    /// Describes a payload of the wrong shape.
    pub fn unexpected(field: &'static str, reason: impl Into<String>) -> Self {
        Self::UnexpectedPayload {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ResponseDecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Deserialize(Arc::new(err))
    }
}
