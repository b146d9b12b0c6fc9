//! Frenzy Runtime - transaction execution for the frenzy chain
//!
//! This crate provides the execution layer around the frenzy registry:
//! - Signed transaction envelopes, applied one at a time (all-or-nothing)
//! - An externally advanced chain clock the registry reads
//! - Fixed-interval block production with event broadcasting
//! - Registry persistence via sled

pub mod block_producer;
pub mod clock;
pub mod persistence;
pub mod processor;
pub mod registry_store;
pub mod transaction;

#[cfg(test)]
mod tests;

pub use block_producer::{BlockProducer, BlockProducerConfig, BlockUpdate, TransactionSender};
pub use clock::ChainClock;
pub use persistence::{ChainMetadata, PersistentStore, RegistryPersistence};
pub use processor::{FrenzyProcessor, TransactionError, TransactionResult};
pub use registry_store::RegistryStore;
pub use transaction::FrenzyTransaction;

/// Block time in milliseconds
pub const BLOCK_TIME_MS: u64 = 400;

/// Maximum transactions per block
pub const MAX_TXS_PER_BLOCK: usize = 64;
