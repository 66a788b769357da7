//! Discovery agent: resolution and registration with the discovery server.
//!
//! Provides [`DiscoveryAgent`], which composes a transport, a response
//! reader and a clock with the two caches. Lookups go through the
//! [`DirectoryCache`]; registrations are skipped while the
//! [`RegistrationCache`] still holds a fresh entry for the service.

use super::directory_cache::{DirectoryCache, DirectoryCacheError};
use crate::discovery::{
    adapters::{HttpDirectoryTransport, JsonResponseReader},
    config::{AgentConfig, AgentConfigError},
    domain::{DirectoryListing, RegistrationCache, Service, Ttl, find_service},
    ports::{DirectoryTransport, ResponseDecodeError, ResponseReader, TransportError},
};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by the discovery agent.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// The listing needed for a lookup could not be obtained.
    #[error("unable to find {name} service")]
    Lookup {
        /// Service being resolved.
        name: String,
        /// Underlying listing failure.
        #[source]
        source: DirectoryCacheError,
    },
    /// The listing was fetched but holds no service with this name.
    #[error("service not found: {name}")]
    NotFound {
        /// Service being resolved.
        name: String,
    },
    /// The registration request could not be delivered.
    #[error("unable to register {name}")]
    Registration {
        /// Service being registered.
        name: String,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },
    /// The server accepted the registration but its renewal TTL is unreadable.
    #[error("unable to read renewal TTL for {name}")]
    RenewalTtl {
        /// Service being registered.
        name: String,
        /// Underlying decode failure.
        #[source]
        source: ResponseDecodeError,
    },
}

/// Result type for discovery agent operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Agent backed by the default HTTP transport and JSON reader.
pub type HttpDiscoveryAgent = DiscoveryAgent<HttpDirectoryTransport, JsonResponseReader, DefaultClock>;

/// Shared TTL and registration ledger.
///
/// Kept under one lock so freshness checks never pair a new TTL with an old
/// registration time, or the other way round.
#[derive(Debug)]
struct RegistrationState {
    ttl: Ttl,
    ledger: RegistrationCache,
}

/// Client-side discovery agent.
///
/// One agent is built per process. It owns the cached listing, the
/// registration ledger and the TTL granted by the server. At most one
/// renewal loop should run per agent and service; starting a second one
/// doubles the registration traffic and is left to the caller to avoid.
pub struct DiscoveryAgent<T, R, C>
where
    T: DirectoryTransport,
    R: ResponseReader,
    C: Clock + Send + Sync,
{
    address: RwLock<String>,
    transport: Arc<T>,
    reader: Arc<R>,
    clock: Arc<C>,
    directory: DirectoryCache<T, R, C>,
    registrations: Mutex<RegistrationState>,
}

impl<T, R, C> DiscoveryAgent<T, R, C>
where
    T: DirectoryTransport,
    R: ResponseReader,
    C: Clock + Send + Sync,
{
    /// Creates an agent for the discovery server at `address`.
    ///
    /// `ttl` applies until the first successful registration replaces it.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        ttl: Ttl,
        transport: Arc<T>,
        reader: Arc<R>,
        clock: Arc<C>,
    ) -> Self {
        let directory = DirectoryCache::new(
            Arc::clone(&transport),
            Arc::clone(&reader),
            Arc::clone(&clock),
        );
        Self {
            address: RwLock::new(address.into()),
            transport,
            reader,
            clock,
            directory,
            registrations: Mutex::new(RegistrationState {
                ttl,
                ledger: RegistrationCache::new(),
            }),
        }
    }

    /// Returns the discovery server address.
    #[must_use]
    pub fn address(&self) -> String {
        self.address
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Points the agent at a different discovery server.
    ///
    /// Cached listings and registrations are kept; they age out under the
    /// current TTL as usual.
    pub fn set_address(&self, address: impl Into<String>) {
        *self.address.write().unwrap_or_else(PoisonError::into_inner) = address.into();
    }

    /// Returns the TTL currently applied to both caches.
    #[must_use]
    pub fn ttl(&self) -> Ttl {
        self.lock_registrations().ttl
    }

    /// Resolves a service by name from the cached listing.
    ///
    /// The listing is refetched first when it is older than the TTL. The
    /// first entry with a matching name wins.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Lookup`] when the listing could not be
    /// refreshed and [`DiscoveryError::NotFound`] when no entry matches.
    pub async fn resolve(&self, name: &str) -> DiscoveryResult<Service> {
        let ttl = self.ttl();
        let services = self
            .directory
            .get(&self.address(), ttl)
            .await
            .map_err(|source| DiscoveryError::Lookup {
                name: name.to_owned(),
                source,
            })?;
        find_service(&services, name)
            .cloned()
            .ok_or_else(|| DiscoveryError::NotFound {
                name: name.to_owned(),
            })
    }

    /// Refetches the service listing regardless of freshness.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryCacheError`] when the refresh fails; the previous
    /// listing is kept.
    pub async fn refresh_services(&self) -> Result<Vec<Service>, DirectoryCacheError> {
        self.directory.force_refresh(&self.address()).await
    }

    /// Returns a copy of the cached listing without contacting the server.
    pub async fn cached_services(&self) -> DirectoryListing {
        self.directory.snapshot().await
    }

    /// Returns `true` when `service` has a registration younger than the TTL.
    #[must_use]
    pub fn is_registered(&self, service: &Service) -> bool {
        let state = self.lock_registrations();
        state
            .ledger
            .is_fresh(service.name(), state.ttl, self.clock.utc())
    }

    /// Registers `service` unless a fresh registration is already recorded.
    ///
    /// Returns `Ok(true)` when the service is registered, either from the
    /// cache or after a successful request, and `Ok(false)` when the server
    /// refused the registration.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the request could not be delivered or
    /// the renewal TTL could not be read.
    pub async fn ensure_registered(&self, service: &Service) -> DiscoveryResult<bool> {
        if self.is_registered(service) {
            debug!(service = service.name(), "registration still fresh");
            return Ok(true);
        }
        self.force_register(service).await
    }

    /// Registers `service` with the discovery server unconditionally.
    ///
    /// On acceptance the server's renewal TTL replaces the agent TTL and the
    /// service is recorded as registered, both in one critical section. A
    /// refusal returns `Ok(false)` and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Registration`] when the request could not be
    /// delivered and [`DiscoveryError::RenewalTtl`] when an accepted response
    /// carries no readable TTL.
    pub async fn force_register(&self, service: &Service) -> DiscoveryResult<bool> {
        let response = self
            .transport
            .register(&self.address(), service)
            .await
            .map_err(|source| DiscoveryError::Registration {
                name: service.name().to_owned(),
                source,
            })?;

        if !response.is_success {
            warn!(
                service = service.name(),
                code = response.code,
                message = %response.message,
                "registration rejected by discovery server"
            );
            return Ok(false);
        }

        let ttl = self.reader.extract_renewal_ttl(&response).map_err(|source| {
            DiscoveryError::RenewalTtl {
                name: service.name().to_owned(),
                source,
            }
        })?;

        {
            let mut state = self.lock_registrations();
            state.ttl = ttl;
            state.ledger.mark_registered(service.name(), self.clock.utc());
        }
        info!(service = service.name(), ttl = %ttl, "service registered");
        Ok(true)
    }

    /// Returns every recorded registration time, fresh or stale.
    #[must_use]
    pub fn cached_registrations(&self) -> HashMap<String, DateTime<Utc>> {
        self.lock_registrations().ledger.snapshot()
    }

    fn lock_registrations(&self) -> MutexGuard<'_, RegistrationState> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl HttpDiscoveryAgent {
    /// Builds an agent that talks HTTP to the server named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentConfigError`] when the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn http_from_config(config: &AgentConfig) -> Result<Self, AgentConfigError> {
        config.validate()?;
        let transport = HttpDirectoryTransport::new(config.request_timeout())?;
        Ok(Self::new(
            config.address.clone(),
            config.ttl(),
            Arc::new(transport),
            Arc::new(JsonResponseReader::new()),
            Arc::new(DefaultClock),
        ))
    }
}
