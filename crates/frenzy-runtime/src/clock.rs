//! Chain Clock
//!
//! The single time source the registry reads. Time never advances on its
//! own: the block producer moves it once per tick, and a driving harness can
//! jump it explicitly.

use solana_sdk::clock::Clock;

/// Externally advanced chain time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainClock {
    /// Current slot (block height)
    slot: u64,
    /// Current unix timestamp in seconds
    unix_timestamp: i64,
    /// Sub-second remainder carried between block ticks, in milliseconds
    residual_ms: u64,
}

impl ChainClock {
    /// Create a clock at slot 0 and the given genesis timestamp
    pub fn new(genesis_timestamp: i64) -> Self {
        Self {
            slot: 0,
            unix_timestamp: genesis_timestamp,
            residual_ms: 0,
        }
    }

    /// Current slot
    pub fn slot(&self) -> u64 {
        self.slot
    }

    /// Current unix timestamp in seconds
    pub fn unix_timestamp(&self) -> i64 {
        self.unix_timestamp
    }

    /// Advance one block
    pub fn advance_slot(&mut self, block_time_ms: u64) {
        self.slot += 1;
        self.residual_ms += block_time_ms;
        self.unix_timestamp += (self.residual_ms / 1000) as i64;
        self.residual_ms %= 1000;
    }

    /// Jump the wall-clock time forward; the slot is unchanged
    pub fn advance_time(&mut self, secs: i64) {
        self.unix_timestamp += secs;
    }

    /// Render the clock value handed to the program
    pub fn to_clock(&self) -> Clock {
        Clock {
            slot: self.slot,
            unix_timestamp: self.unix_timestamp,
            ..Clock::default()
        }
    }
}
