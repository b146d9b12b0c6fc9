//! Frenzy Registry State
//!
//! Record structures for polling contests.

use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use solana_program::{clock::Clock, pubkey::Pubkey};

/// Lifecycle of a single frenzy
///
/// Transitions are monotonic: `Inactive -> Active -> Completed`.
/// No other transition exists and none is ever reversed.
#[derive(
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
)]
pub enum FrenzyStatus {
    #[default]
    Inactive,
    Active,
    Completed,
}

/// One polling contest
#[derive(BorshSerialize, BorshDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Frenzy {
    /// Sequential id assigned at creation, never reused
    pub id: u64,
    /// Contest name, unique across all frenzies ever created
    pub name: String,
    /// Option labels, fixed at creation
    pub options: Vec<String>,
    /// Lifecycle status
    pub status: FrenzyStatus,
    /// Identity that created the frenzy; the only identity allowed to start it
    pub creator: Pubkey,
    /// Unix timestamp at which voting closes; 0 until the frenzy is started
    pub end_time: i64,
    /// Accumulated votes, index-aligned with `options`
    pub vote_counts: Vec<u64>,
    /// Identities that already voted
    pub voters: BTreeSet<Pubkey>,
}

impl Frenzy {
    /// Create a fresh inactive frenzy with zeroed tallies and no voters
    pub fn new(id: u64, name: String, options: Vec<String>, creator: Pubkey) -> Self {
        let tally_len = options.len();
        Self {
            id,
            name,
            options,
            status: FrenzyStatus::Inactive,
            creator,
            end_time: 0,
            vote_counts: vec![0; tally_len],
            voters: BTreeSet::new(),
        }
    }

    /// Check if the frenzy is accepting votes
    pub fn is_active(&self) -> bool {
        self.status == FrenzyStatus::Active
    }

    /// Whether the voting window has elapsed at the supplied time
    pub fn has_ended(&self, clock: &Clock) -> bool {
        clock.unix_timestamp >= self.end_time
    }

    /// Whether `identity` has already cast a vote
    pub fn has_voted(&self, identity: &Pubkey) -> bool {
        self.voters.contains(identity)
    }

    /// Record one vote
    ///
    /// The caller has already enforced the status, bounds and
    /// one-vote-per-identity rules.
    pub fn record_vote(&mut self, identity: Pubkey, option_index: u32) {
        self.voters.insert(identity);
        self.vote_counts[option_index as usize] += 1;
    }

    /// Index of the plurality winner
    ///
    /// Linear scan keeping only strictly greater counts, so an exact tie
    /// resolves to the lowest index.
    pub fn winning_option(&self) -> usize {
        let mut winner = 0;
        let mut best = self.vote_counts.first().copied().unwrap_or(0);
        for (index, &count) in self.vote_counts.iter().enumerate().skip(1) {
            if count > best {
                winner = index;
                best = count;
            }
        }
        winner
    }

    /// Total votes cast so far
    pub fn total_votes(&self) -> u64 {
        self.vote_counts.iter().sum()
    }
}
