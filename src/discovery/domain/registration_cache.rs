//! Registration ledger used to skip redundant registrations.

use super::Ttl;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Records when each service name was last confirmed as registered.
///
/// Entries are written only after the server accepted a registration and are
/// never pruned; a stale entry is ignored by [`is_fresh`](Self::is_fresh)
/// and overwritten by the next successful registration. The ledger itself
/// holds no lock: the agent guards it together with the shared TTL so a
/// reader always sees a matching pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationCache {
    registered: HashMap<String, DateTime<Utc>>,
}

impl RegistrationCache {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` iff `name` has a recorded registration that is still
    /// within `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, name: &str, ttl: Ttl, now: DateTime<Utc>) -> bool {
        self.registered
            .get(name)
            .is_some_and(|registered_at| ttl.is_fresh(*registered_at, now))
    }

    /// Records `now` as the registration time for `name`.
    pub fn mark_registered(&mut self, name: impl Into<String>, now: DateTime<Utc>) {
        self.registered.insert(name.into(), now);
    }

    /// Returns the recorded registration time for `name`.
    #[must_use]
    pub fn registered_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.registered.get(name).copied()
    }

    /// Returns a copy of every recorded registration.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, DateTime<Utc>> {
        self.registered.clone()
    }

    /// Returns the number of recorded service names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Returns `true` when nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
