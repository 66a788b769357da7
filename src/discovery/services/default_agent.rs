//! Process-wide default agent holder.

use super::agent::HttpDiscoveryAgent;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Explicit holder for a shared agent.
///
/// Nothing is installed implicitly: build the agent, then
/// [`install`](Self::install) it. Installing again replaces the previous
/// agent, which stays alive for as long as callers hold clones of it.
#[derive(Debug)]
pub struct AgentSlot<A> {
    slot: RwLock<Option<Arc<A>>>,
}

impl<A> AgentSlot<A> {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Installs `agent`, returning the agent it replaces.
    pub fn install(&self, agent: Arc<A>) -> Option<Arc<A>> {
        self.write().replace(agent)
    }

    /// Returns the installed agent.
    #[must_use]
    pub fn get(&self) -> Option<Arc<A>> {
        self.read().clone()
    }

    /// Removes and returns the installed agent.
    pub fn clear(&self) -> Option<Arc<A>> {
        self.write().take()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Arc<A>>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<A>>> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A> Default for AgentSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Default agent for the process.
pub static DEFAULT_AGENT: AgentSlot<HttpDiscoveryAgent> = AgentSlot::new();
