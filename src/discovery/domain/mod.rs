//! Domain model for service discovery.
//!
//! The discovery domain models registrable service endpoints, the TTL that
//! governs cache freshness, and the two caches kept by the agent: the
//! directory listing and the registration ledger. Nothing in here performs
//! I/O; timestamps are always passed in by the caller.

mod directory_listing;
mod registration_cache;
mod service;
mod ttl;

pub use directory_listing::{DirectoryListing, find_service};
pub use registration_cache::RegistrationCache;
pub use service::Service;
pub use ttl::Ttl;
