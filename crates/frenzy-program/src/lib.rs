//! Frenzy Registry Program
//!
//! A single-purpose polling primitive: named contests ("Frenzies") with a
//! fixed option list, a creator-controlled activation window,
//! one-vote-per-identity tallying, and plurality resolution once the window
//! elapses.
//!
//! The registry is one owned store threaded through every operation handler.
//! The acting identity and the current time are explicit arguments supplied
//! by the runtime - the program never reads a system clock.

pub mod error;
pub mod event;
pub mod instruction;
pub mod processor;
pub mod registry;
pub mod state;

pub use error::FrenzyError;
pub use event::FrenzyEvent;
pub use instruction::FrenzyInstruction;
pub use registry::FrenzyRegistry;
pub use state::{Frenzy, FrenzyStatus};

/// Constants
pub mod constants {
    /// Announcement carried by every `FrenzyStarted` event
    pub const FRENZY_ANNOUNCEMENT: &str = "A new Frenzy has started! Cast your vote now!";

    /// Id handed to the first frenzy ever created
    pub const FIRST_FRENZY_ID: u64 = 1;
}
