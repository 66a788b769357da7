//! TTL-gated read-through cache over the service listing.

use crate::discovery::{
    domain::{DirectoryListing, Service, Ttl},
    ports::{DirectoryTransport, ResponseDecodeError, ResponseReader, TransportError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Errors raised while refreshing the service listing.
///
/// None of these touch the cached entries; the previous listing stays in
/// place until a refresh succeeds.
#[derive(Debug, Clone, Error)]
pub enum DirectoryCacheError {
    /// The discovery server could not be reached.
    #[error("unable to get services")]
    Transport(#[source] TransportError),
    /// The listing payload had an unexpected shape.
    #[error("unable to get services")]
    Decode(#[from] ResponseDecodeError),
    /// The server answered but refused to list services.
    #[error("unable to get services: server responded with code {code}: {message}")]
    Rejected {
        /// Code reported by the server.
        code: i64,
        /// Message reported by the server.
        message: String,
    },
}

/// Result type for directory cache operations.
pub type DirectoryCacheResult<T> = Result<T, DirectoryCacheError>;

/// Serves the last listing while it is fresh and refetches it otherwise.
///
/// The listing lock is held across the refetch, so concurrent readers that
/// find the cache stale wait for one refresh instead of issuing their own.
pub struct DirectoryCache<T, R, C>
where
    T: DirectoryTransport,
    R: ResponseReader,
    C: Clock + Send + Sync,
{
    transport: Arc<T>,
    reader: Arc<R>,
    clock: Arc<C>,
    listing: Mutex<DirectoryListing>,
}

impl<T, R, C> DirectoryCache<T, R, C>
where
    T: DirectoryTransport,
    R: ResponseReader,
    C: Clock + Send + Sync,
{
    /// Creates an empty cache that refreshes on first use.
    #[must_use]
    pub fn new(transport: Arc<T>, reader: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            transport,
            reader,
            clock,
            listing: Mutex::new(DirectoryListing::new()),
        }
    }

    /// Returns the cached services, refreshing from `address` when stale.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryCacheError`] when a refresh was needed and failed.
    pub async fn get(&self, address: &str, ttl: Ttl) -> DirectoryCacheResult<Vec<Service>> {
        let mut listing = self.listing.lock().await;
        if listing.is_fresh(ttl, self.clock.utc()) {
            debug!(entries = listing.entries().len(), "serving cached service listing");
            return Ok(listing.entries().to_vec());
        }
        self.refresh(&mut listing, address).await
    }

    /// Refetches the listing from `address` regardless of freshness.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryCacheError`] when the transport fails, the server
    /// rejects the request, or the payload cannot be decoded.
    pub async fn force_refresh(&self, address: &str) -> DirectoryCacheResult<Vec<Service>> {
        let mut listing = self.listing.lock().await;
        self.refresh(&mut listing, address).await
    }

    /// Returns a copy of the cached listing without refreshing it.
    pub async fn snapshot(&self) -> DirectoryListing {
        self.listing.lock().await.clone()
    }

    async fn refresh(
        &self,
        listing: &mut DirectoryListing,
        address: &str,
    ) -> DirectoryCacheResult<Vec<Service>> {
        let response = self
            .transport
            .list_services(address)
            .await
            .map_err(DirectoryCacheError::Transport)?;
        if !response.is_success {
            return Err(DirectoryCacheError::Rejected {
                code: response.code,
                message: response.message,
            });
        }
        let services = self.reader.extract_services(&response)?;
        listing.replace(services.clone(), self.clock.utc());
        debug!(entries = services.len(), "service listing refreshed");
        Ok(services)
    }
}
