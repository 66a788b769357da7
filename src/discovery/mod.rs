//! Client-side service discovery.
//!
//! Registers a local service with a remote discovery server, keeps the
//! registration alive in the background, and resolves other services by
//! name from a TTL-gated cache of the server's listing. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Agent settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;
