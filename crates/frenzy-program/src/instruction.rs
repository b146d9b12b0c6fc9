//! Frenzy Registry Instructions

use borsh::{BorshDeserialize, BorshSerialize};

/// Frenzy registry instructions
///
/// Call data is the borsh encoding of one of these variants. Call data that
/// does not decode exactly is an unknown operation.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum FrenzyInstruction {
    /// Create a new frenzy
    ///
    /// The name must not collide with any frenzy ever created. The option
    /// list is fixed at creation; its contents are not validated beyond the
    /// list being non-empty.
    CreateFrenzy {
        name: String,
        options: Vec<String>,
    },

    /// Open a frenzy's voting window
    ///
    /// Creator-only. The window closes `duration_secs` after the current
    /// time.
    StartFrenzy {
        id: u64,
        duration_secs: i64,
    },

    /// Cast one vote for an option
    ///
    /// Accepted while the frenzy is active, at most once per identity.
    Vote {
        id: u64,
        option_index: u32,
    },

    /// Resolve a frenzy whose voting window has elapsed
    ///
    /// Completes the frenzy and fixes the plurality winner permanently.
    CheckFrenzy {
        id: u64,
    },
}
