//! Frenzy Registry
//!
//! The single owned store of all frenzies, keyed by sequential id. One
//! instance is constructed at system start and threaded by reference through
//! every operation handler; completed frenzies are never removed.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::state::{Frenzy, FrenzyStatus};

/// Registry of all frenzies ever created
#[derive(
    BorshSerialize, BorshDeserialize, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq,
)]
pub struct FrenzyRegistry {
    /// All frenzies, keyed by id
    frenzies: BTreeMap<u64, Frenzy>,
    /// Number of frenzies ever created
    frenzy_count: u64,
}

impl FrenzyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frenzies ever created
    pub fn frenzy_count(&self) -> u64 {
        self.frenzy_count
    }

    /// Id the next created frenzy will receive
    pub fn next_id(&self) -> u64 {
        self.frenzy_count + 1
    }

    /// Look up a frenzy by id
    pub fn get(&self, id: u64) -> Option<&Frenzy> {
        self.frenzies.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: u64) -> Option<&mut Frenzy> {
        self.frenzies.get_mut(&id)
    }

    /// Whether any frenzy, in any status, already uses `name`
    ///
    /// Case-sensitive exact match.
    pub fn name_exists(&self, name: &str) -> bool {
        self.frenzies.values().any(|f| f.name == name)
    }

    /// Insert a freshly created frenzy and bump the counter
    ///
    /// The frenzy's id must equal `next_id()`.
    pub(crate) fn insert(&mut self, frenzy: Frenzy) {
        debug_assert_eq!(frenzy.id, self.next_id());
        self.frenzies.insert(frenzy.id, frenzy);
        self.frenzy_count += 1;
    }

    /// All frenzies currently in `Active` status, ordered by id
    pub fn active_frenzies(&self) -> Vec<Frenzy> {
        self.frenzies
            .values()
            .filter(|f| f.status == FrenzyStatus::Active)
            .cloned()
            .collect()
    }

    /// The immutable option list of a frenzy
    pub fn frenzy_options(&self, id: u64) -> Option<Vec<String>> {
        self.frenzies.get(&id).map(|f| f.options.clone())
    }

    /// Iterate over every frenzy ever created, ordered by id
    pub fn all_frenzies(&self) -> impl Iterator<Item = &Frenzy> {
        self.frenzies.values()
    }

    /// Rebuild a registry from persisted records
    pub fn from_records(records: Vec<Frenzy>, frenzy_count: u64) -> Self {
        let frenzies = records.into_iter().map(|f| (f.id, f)).collect();
        Self {
            frenzies,
            frenzy_count,
        }
    }
}
