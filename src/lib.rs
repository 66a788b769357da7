//! Discoverer: client-side agent for a service discovery server.
//!
//! The crate resolves named services to network endpoints through a
//! TTL-gated cache of the server's directory and keeps the caller's own
//! services registered, renewing them on a background loop until cancelled.
//!
//! # Architecture
//!
//! Discoverer follows hexagonal architecture principles:
//!
//! - **Domain**: Services, TTLs and the listing and registration caches
//! - **Ports**: Abstract transport and response reader interfaces
//! - **Adapters**: HTTP, in-memory and JSON implementations of the ports
//! - **Services**: The discovery agent and its renewal loop
//!
//! # Modules
//!
//! - [`discovery`]: Service resolution, registration and renewal

pub mod discovery;
