//! Shared Registry Store
//!
//! Single-writer wrapper around the frenzy registry. The processor holds the
//! write lock for the duration of one transaction; RPC readers take cheap
//! snapshots of individual records.

use std::sync::Arc;

use frenzy_program::{Frenzy, FrenzyRegistry};
use parking_lot::{RwLock, RwLockWriteGuard};

/// Thread-safe handle to the single registry instance
#[derive(Clone, Default)]
pub struct RegistryStore {
    registry: Arc<RwLock<FrenzyRegistry>>,
}

impl RegistryStore {
    /// Create a store holding an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing registry
    pub fn from_registry(registry: FrenzyRegistry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    /// Exclusive access for one operation
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, FrenzyRegistry> {
        self.registry.write()
    }

    /// Number of frenzies ever created
    pub fn frenzy_count(&self) -> u64 {
        self.registry.read().frenzy_count()
    }

    /// Look up one frenzy by id
    pub fn get_frenzy(&self, id: u64) -> Option<Frenzy> {
        self.registry.read().get(id).cloned()
    }

    /// All frenzies currently accepting votes
    pub fn active_frenzies(&self) -> Vec<Frenzy> {
        self.registry.read().active_frenzies()
    }

    /// The immutable option list of a frenzy
    pub fn frenzy_options(&self, id: u64) -> Option<Vec<String>> {
        self.registry.read().frenzy_options(id)
    }

    /// Clone of the whole registry, for persistence
    pub fn snapshot(&self) -> FrenzyRegistry {
        self.registry.read().clone()
    }

    /// Replace the registry wholesale (state restore on boot)
    pub fn restore(&self, registry: FrenzyRegistry) {
        *self.registry.write() = registry;
    }
}
