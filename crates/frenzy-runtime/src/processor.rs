//! Frenzy Transaction Processor
//!
//! Applies signed transaction envelopes to the registry one at a time.
//! Each transaction either fully applies or has no effect; the registry
//! never observes two operations in flight.

use std::sync::Arc;

use frenzy_program::{processor as program, FrenzyError, FrenzyEvent};
use parking_lot::RwLock;
use solana_sdk::hash::Hash;

use crate::{clock::ChainClock, registry_store::RegistryStore, transaction::FrenzyTransaction};

/// Why a transaction did not apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("signature verification failed")]
    SignatureFailure,

    #[error(transparent)]
    Rejected(#[from] FrenzyError),
}

/// Result of processing a single transaction
#[derive(Debug, Clone)]
pub struct TransactionResult {
    pub hash: Hash,
    pub slot: u64,
    pub success: bool,
    pub error: Option<TransactionError>,
    pub events: Vec<FrenzyEvent>,
    pub logs: Vec<String>,
}

/// Frenzy Transaction Processor
///
/// Owns the chain clock and a handle to the registry store, and provides
/// the high-level interface for applying transactions.
pub struct FrenzyProcessor {
    /// Registry storage
    store: RegistryStore,
    /// Chain time, advanced by the block producer or a driving harness
    clock: Arc<RwLock<ChainClock>>,
}

impl FrenzyProcessor {
    /// Create a new processor at slot 0 and the given genesis timestamp
    pub fn new(store: RegistryStore, genesis_timestamp: i64) -> Self {
        Self {
            store,
            clock: Arc::new(RwLock::new(ChainClock::new(genesis_timestamp))),
        }
    }

    /// Handle to the registry store
    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Current slot
    pub fn current_slot(&self) -> u64 {
        self.clock.read().slot()
    }

    /// Current chain time in unix seconds
    pub fn current_timestamp(&self) -> i64 {
        self.clock.read().unix_timestamp()
    }

    /// Advance the chain one block
    pub fn advance_slot(&self, block_time_ms: u64) {
        self.clock.write().advance_slot(block_time_ms);
    }

    /// Jump the chain clock forward
    ///
    /// Time is supplied to the registry, never read from the system; this is
    /// the hook a driving harness uses to make voting windows elapse.
    pub fn advance_time(&self, secs: i64) {
        self.clock.write().advance_time(secs);
    }

    /// Process a batch of transactions in submission order
    pub fn process_transactions(
        &self,
        transactions: &[FrenzyTransaction],
    ) -> Vec<TransactionResult> {
        transactions
            .iter()
            .map(|tx| self.process_transaction(tx))
            .collect()
    }

    /// Process one transaction
    pub fn process_transaction(&self, tx: &FrenzyTransaction) -> TransactionResult {
        let hash = Hash::new_from_array(tx.compute_hash());
        let clock = self.clock.read().to_clock();
        let slot = clock.slot;
        let mut logs = Vec::new();

        if !tx.verify() {
            logs.push("signature verification failed".to_string());
            return TransactionResult {
                hash,
                slot,
                success: false,
                error: Some(TransactionError::SignatureFailure),
                events: Vec::new(),
                logs,
            };
        }

        let mut registry = self.store.write();
        match program::process(&mut registry, &tx.sender, &clock, &tx.call_data, tx.value) {
            Ok(events) => {
                for event in &events {
                    logs.push(describe_event(event));
                }
                tracing::debug!("tx {} applied ({} events)", hash, events.len());
                TransactionResult {
                    hash,
                    slot,
                    success: true,
                    error: None,
                    events,
                    logs,
                }
            }
            Err(err) => {
                logs.push(format!("rejected: {}", err));
                tracing::debug!("tx {} rejected: {}", hash, err);
                TransactionResult {
                    hash,
                    slot,
                    success: false,
                    error: Some(TransactionError::Rejected(err)),
                    events: Vec::new(),
                    logs,
                }
            }
        }
    }
}

fn describe_event(event: &FrenzyEvent) -> String {
    match event {
        FrenzyEvent::FrenzyStarted { name, .. } => format!("FrenzyStarted: {}", name),
        FrenzyEvent::FrenzyCompleted {
            name,
            winning_option,
            ..
        } => format!("FrenzyCompleted: {} -> {}", name, winning_option),
    }
}
