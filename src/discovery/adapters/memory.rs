//! In-memory transport adapter for discovery tests.

use crate::discovery::{
    domain::Service,
    ports::{
        DirectoryTransport, ListingResponse, RegistrationResponse, TransportError,
        TransportResult,
    },
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Scripted discovery server that records every call.
///
/// This adapter replays configured responses without touching the network.
/// It is suitable for unit and behaviour tests that need to count round
/// trips. Each call yields to the scheduler once before answering so that
/// concurrent callers interleave the way they would against a real server.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectoryTransport {
    state: Arc<Mutex<InMemoryTransportState>>,
}

#[derive(Debug)]
struct InMemoryTransportState {
    listing: Result<ListingResponse, String>,
    registration: Result<RegistrationResponse, String>,
    list_calls: usize,
    registrations: Vec<RecordedRegistration>,
}

impl Default for InMemoryTransportState {
    fn default() -> Self {
        Self {
            listing: Ok(ListingResponse::with_services(&[])),
            registration: Ok(RegistrationResponse::rejected(
                404,
                "no registration behaviour configured",
            )),
            list_calls: 0,
            registrations: Vec::new(),
        }
    }
}

/// Registration request observed by [`InMemoryDirectoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRegistration {
    /// Address the request was sent to.
    pub address: String,
    /// Service that was registered.
    pub service: Service,
}

impl InMemoryDirectoryTransport {
    /// Creates a transport that lists nothing and rejects registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryTransportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serves `services` as a successful listing.
    pub fn set_services(&self, services: &[Service]) {
        self.state().listing = Ok(ListingResponse::with_services(services));
    }

    /// Serves `response` verbatim for every listing request.
    pub fn set_listing_response(&self, response: ListingResponse) {
        self.state().listing = Ok(response);
    }

    /// Fails every listing request with a send error carrying `message`.
    pub fn fail_listing(&self, message: impl Into<String>) {
        self.state().listing = Err(message.into());
    }

    /// Serves `response` verbatim for every registration request.
    pub fn set_registration_response(&self, response: RegistrationResponse) {
        self.state().registration = Ok(response);
    }

    /// Fails every registration request with a send error carrying `message`.
    pub fn fail_registration(&self, message: impl Into<String>) {
        self.state().registration = Err(message.into());
    }

    /// Returns how many listing requests were made.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    /// Returns how many registration requests were made.
    #[must_use]
    pub fn register_calls(&self) -> usize {
        self.state().registrations.len()
    }

    /// Returns every registration request in arrival order.
    #[must_use]
    pub fn registrations(&self) -> Vec<RecordedRegistration> {
        self.state().registrations.clone()
    }
}

fn send_failure(message: &str) -> TransportError {
    TransportError::request(std::io::Error::other(message.to_owned()))
}

#[async_trait]
impl DirectoryTransport for InMemoryDirectoryTransport {
    async fn list_services(&self, _address: &str) -> TransportResult<ListingResponse> {
        tokio::task::yield_now().await;
        let mut state = self.state();
        state.list_calls += 1;
        state
            .listing
            .clone()
            .map_err(|message| send_failure(&message))
    }

    async fn register(
        &self,
        address: &str,
        service: &Service,
    ) -> TransportResult<RegistrationResponse> {
        tokio::task::yield_now().await;
        let mut state = self.state();
        state.registrations.push(RecordedRegistration {
            address: address.to_owned(),
            service: service.clone(),
        });
        state
            .registration
            .clone()
            .map_err(|message| send_failure(&message))
    }
}
