//! Frenzy Registry Errors

use thiserror::Error;

/// Frenzy registry errors
///
/// Every invalid-input or invalid-state condition maps to exactly one
/// variant. A rejected operation has no effect on the registry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrenzyError {
    #[error("Frenzy name already exists")]
    DuplicateName,

    #[error("Only the creator can start a frenzy")]
    NotCreator,

    #[error("Frenzy is not in the required status")]
    InvalidStatus,

    #[error("Frenzy is not active")]
    NotActive,

    #[error("Invalid option")]
    InvalidOption,

    #[error("Identity has already voted")]
    AlreadyVoted,

    #[error("Voting window has not elapsed yet")]
    TooEarly,

    #[error("The registry does not accept payments")]
    PaymentNotAccepted,

    #[error("Unknown operation")]
    UnknownOperation,
}
