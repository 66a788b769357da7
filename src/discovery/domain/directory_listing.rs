//! Cached service listing.

use super::{Service, Ttl};
use chrono::{DateTime, Utc};

/// Last successful service listing fetched from the discovery server.
///
/// `last_refreshed_at` is only ever set together with a successful
/// [`replace`](Self::replace); a failed refresh leaves both fields alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    entries: Vec<Service>,
    last_refreshed_at: Option<DateTime<Utc>>,
}

impl DirectoryListing {
    /// Creates an empty listing that has never been refreshed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            last_refreshed_at: None,
        }
    }

    /// Returns the cached entries in the order the server listed them.
    #[must_use]
    pub fn entries(&self) -> &[Service] {
        &self.entries
    }

    /// Returns when the listing was last refreshed, if ever.
    #[must_use]
    pub const fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed_at
    }

    /// Returns `true` when the listing may be served without a refresh.
    #[must_use]
    pub fn is_fresh(&self, ttl: Ttl, now: DateTime<Utc>) -> bool {
        self.last_refreshed_at
            .is_some_and(|refreshed_at| ttl.is_fresh(refreshed_at, now))
    }

    /// Replaces the cached entries after a successful fetch.
    pub fn replace(&mut self, entries: Vec<Service>, refreshed_at: DateTime<Utc>) {
        self.entries = entries;
        self.last_refreshed_at = Some(refreshed_at);
    }

    /// Returns the first entry named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Service> {
        find_service(&self.entries, name)
    }
}

/// Returns the first service in `services` named `name`.
///
/// Listing order is whatever the server returned, so duplicates resolve to
/// the earliest entry.
#[must_use]
pub fn find_service<'a>(services: &'a [Service], name: &str) -> Option<&'a Service> {
    services.iter().find(|service| service.name() == name)
}
