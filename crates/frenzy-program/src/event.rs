//! Frenzy Registry Events

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Notifications emitted by the registry for external listeners
#[derive(BorshSerialize, BorshDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum FrenzyEvent {
    /// A frenzy opened its voting window
    FrenzyStarted {
        name: String,
        announcement: String,
    },

    /// A frenzy was resolved and its winner fixed
    FrenzyCompleted {
        name: String,
        options: Vec<String>,
        winning_option: String,
    },
}
