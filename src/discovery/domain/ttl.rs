//! Time-to-live shared by the directory and registration caches.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Number of whole seconds a cached value stays valid.
///
/// A TTL of zero disables caching: nothing is ever considered fresh, so every
/// lookup or registration check goes back to the discovery server.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ttl(u64);

impl Ttl {
    /// TTL that disables caching.
    pub const DISABLED: Self = Self(0);

    /// Creates a TTL from whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the TTL in whole seconds.
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Returns the TTL as a standard duration.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }

    /// Returns `true` when caching is disabled.
    #[must_use]
    pub const fn is_disabled(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when a value stamped at `since` is still valid at `now`.
    ///
    /// Freshness holds iff `now < since + ttl`. A window too large to
    /// represent never expires.
    #[must_use]
    pub fn is_fresh(self, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.is_disabled() {
            return false;
        }
        i64::try_from(self.0)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|window| since.checked_add_signed(window))
            .is_none_or(|expiry| now < expiry)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
