//! HTTP transport adapter backed by `reqwest`.

use crate::discovery::{
    domain::Service,
    ports::{
        DirectoryTransport, ListingResponse, RegistrationResponse, TransportError,
        TransportResult,
    },
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Talks to a discovery server over plain HTTP.
///
/// Listing is a `GET` of the server address; registration is a form `POST`
/// of `name`, `host` and `port` to the same address. Both answer with a JSON
/// envelope of `IsSuccess`, `Data`, `Message` and `Code`.
#[derive(Debug, Clone)]
pub struct HttpDirectoryTransport {
    client: reqwest::Client,
}

impl HttpDirectoryTransport {
    /// Creates a transport whose requests time out after `request_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when the HTTP client cannot be
    /// built (for example when no TLS backend is available).
    pub fn new(request_timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(TransportError::request)?;
        Ok(Self { client })
    }

    /// Creates a transport over a preconfigured client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectoryTransport for HttpDirectoryTransport {
    async fn list_services(&self, address: &str) -> TransportResult<ListingResponse> {
        debug!(address, "requesting service listing");
        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(TransportError::request)?;
        response
            .json::<ListingResponse>()
            .await
            .map_err(TransportError::malformed_body)
    }

    async fn register(
        &self,
        address: &str,
        service: &Service,
    ) -> TransportResult<RegistrationResponse> {
        debug!(address, service = service.name(), "sending registration");
        let form = [
            ("name", service.name()),
            ("host", service.host()),
            ("port", service.port()),
        ];
        let response = self
            .client
            .post(address)
            .form(&form)
            .send()
            .await
            .map_err(TransportError::request)?;
        response
            .json::<RegistrationResponse>()
            .await
            .map_err(TransportError::malformed_body)
    }
}
