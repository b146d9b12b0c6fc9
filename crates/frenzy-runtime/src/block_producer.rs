//! Block Producer
//!
//! Drains submitted transactions at a fixed interval, applies them in
//! submission order, advances the chain clock, and broadcasts the resulting
//! block update (including registry events) to subscribers.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use frenzy_program::FrenzyEvent;
use solana_sdk::hash::Hash;
use tokio::sync::broadcast;

use crate::{
    processor::{FrenzyProcessor, TransactionResult},
    transaction::FrenzyTransaction,
    BLOCK_TIME_MS, MAX_TXS_PER_BLOCK,
};

/// Block update event sent to subscribers
#[derive(Clone, Debug)]
pub struct BlockUpdate {
    /// Slot (block height)
    pub slot: u64,
    /// Blockhash for this block
    pub blockhash: Hash,
    /// Number of transactions processed
    pub transaction_count: usize,
    /// Transaction results
    pub transaction_results: Vec<TransactionResult>,
    /// Registry events emitted in this block
    pub events: Vec<FrenzyEvent>,
    /// Block production time in microseconds
    pub processing_time_us: u64,
}

/// Block producer configuration
#[derive(Clone, Debug)]
pub struct BlockProducerConfig {
    /// Block time in milliseconds
    pub block_time_ms: u64,
    /// Maximum transactions per block
    pub max_txs_per_block: usize,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for BlockProducerConfig {
    fn default() -> Self {
        Self {
            block_time_ms: BLOCK_TIME_MS,
            max_txs_per_block: MAX_TXS_PER_BLOCK,
            verbose: false,
        }
    }
}

/// Handle for submitting transactions to the block producer
#[derive(Clone)]
pub struct TransactionSender {
    sender: Sender<FrenzyTransaction>,
}

impl TransactionSender {
    /// Submit a transaction for processing
    pub fn send(&self, tx: FrenzyTransaction) -> Result<(), String> {
        self.sender
            .try_send(tx)
            .map_err(|e| format!("Failed to submit transaction: {}", e))
    }
}

/// Block Producer
///
/// Runs the chain loop: one block per interval, transactions totally ordered
/// by arrival.
pub struct BlockProducer {
    /// Transaction processor
    processor: FrenzyProcessor,
    /// Transaction receiver
    tx_receiver: Receiver<FrenzyTransaction>,
    /// Transaction sender (for cloning)
    tx_sender: Sender<FrenzyTransaction>,
    /// Block update broadcaster
    update_sender: broadcast::Sender<BlockUpdate>,
    /// Hash of the latest produced block
    current_blockhash: Hash,
    /// Configuration
    config: BlockProducerConfig,
    /// Running flag
    running: Arc<AtomicBool>,
}

impl BlockProducer {
    /// Create a new block producer
    pub fn new(processor: FrenzyProcessor, config: BlockProducerConfig) -> Self {
        let (tx_sender, tx_receiver) = bounded(1024);
        let (update_sender, _) = broadcast::channel(64);

        Self {
            processor,
            tx_receiver,
            tx_sender,
            update_sender,
            current_blockhash: Hash::default(),
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a sender for submitting transactions
    pub fn transaction_sender(&self) -> TransactionSender {
        TransactionSender {
            sender: self.tx_sender.clone(),
        }
    }

    /// Subscribe to block updates
    pub fn subscribe(&self) -> broadcast::Receiver<BlockUpdate> {
        self.update_sender.subscribe()
    }

    /// Check if the block producer is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the block producer
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Current slot
    pub fn current_slot(&self) -> u64 {
        self.processor.current_slot()
    }

    /// Current blockhash
    pub fn current_blockhash(&self) -> Hash {
        self.current_blockhash
    }

    /// Drain the intake queue up to the per-block limit
    fn drain_queue(&self, pending_txs: &mut Vec<FrenzyTransaction>) -> bool {
        loop {
            match self.tx_receiver.try_recv() {
                Ok(tx) => {
                    pending_txs.push(tx);
                    if pending_txs.len() >= self.config.max_txs_per_block {
                        return true;
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Transaction channel disconnected");
                    return false;
                }
            }
        }
    }

    /// Produce one block from the pending transactions
    fn produce_block(&mut self, pending_txs: &mut Vec<FrenzyTransaction>, tick_start: Instant) -> BlockUpdate {
        let transaction_results = self.processor.process_transactions(pending_txs);
        let tx_count = pending_txs.len();
        pending_txs.clear();

        // Advance slot and chain time
        self.processor.advance_slot(self.config.block_time_ms);
        let slot = self.processor.current_slot();

        self.current_blockhash = next_blockhash(&self.current_blockhash, slot, &transaction_results);

        let events: Vec<FrenzyEvent> = transaction_results
            .iter()
            .filter(|r| r.success)
            .flat_map(|r| r.events.iter().cloned())
            .collect();

        BlockUpdate {
            slot,
            blockhash: self.current_blockhash,
            transaction_count: tx_count,
            transaction_results,
            events,
            processing_time_us: tick_start.elapsed().as_micros() as u64,
        }
    }

    /// Run the block producer (blocking)
    ///
    /// This should be spawned on a dedicated thread.
    pub fn run(&mut self) {
        self.running.store(true, Ordering::SeqCst);

        let block_duration = Duration::from_millis(self.config.block_time_ms);
        let mut pending_txs: Vec<FrenzyTransaction> =
            Vec::with_capacity(self.config.max_txs_per_block);

        tracing::info!(
            "Block producer started ({}ms blocks)",
            self.config.block_time_ms
        );

        while self.running.load(Ordering::SeqCst) {
            let tick_start = Instant::now();

            if !self.drain_queue(&mut pending_txs) {
                self.running.store(false, Ordering::SeqCst);
                return;
            }

            let update = self.produce_block(&mut pending_txs, tick_start);
            let processing_time = tick_start.elapsed();

            if self.config.verbose && update.transaction_count > 0 {
                tracing::debug!(
                    "Slot {} | {} txs | {:.2}ms",
                    update.slot,
                    update.transaction_count,
                    processing_time.as_secs_f64() * 1000.0
                );
            }

            // Broadcast to subscribers (ignore errors if no subscribers)
            let _ = self.update_sender.send(update);

            if processing_time > block_duration {
                tracing::warn!(
                    "Block {} took {:.2}ms (target: {}ms)",
                    self.processor.current_slot(),
                    processing_time.as_secs_f64() * 1000.0,
                    self.config.block_time_ms
                );
            }

            if let Some(sleep_time) = block_duration.checked_sub(processing_time) {
                std::thread::sleep(sleep_time);
            }
        }

        tracing::info!(
            "Block producer stopped at slot {}",
            self.processor.current_slot()
        );
    }

    /// Run the block producer asynchronously (tokio)
    pub async fn run_async(mut self) {
        self.running.store(true, Ordering::SeqCst);

        let block_duration = Duration::from_millis(self.config.block_time_ms);
        let mut interval = tokio::time::interval(block_duration);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut pending_txs: Vec<FrenzyTransaction> =
            Vec::with_capacity(self.config.max_txs_per_block);

        tracing::info!(
            "Block producer started ({}ms blocks)",
            self.config.block_time_ms
        );

        while self.running.load(Ordering::SeqCst) {
            interval.tick().await;
            let tick_start = Instant::now();

            if !self.drain_queue(&mut pending_txs) {
                return;
            }

            let update = self.produce_block(&mut pending_txs, tick_start);
            let processing_time = tick_start.elapsed();

            let _ = self.update_sender.send(update);

            if processing_time > block_duration {
                tracing::warn!(
                    "Block {} took {:.2}ms (target: {}ms)",
                    self.processor.current_slot(),
                    processing_time.as_secs_f64() * 1000.0,
                    self.config.block_time_ms
                );
            }
        }

        tracing::info!("Block producer stopped");
    }
}

/// Chain the next blockhash from the previous one and the block contents
fn next_blockhash(prev: &Hash, slot: u64, results: &[TransactionResult]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(prev.as_ref());
    hasher.update(&slot.to_le_bytes());
    for result in results {
        hasher.update(result.hash.as_ref());
    }
    Hash::new_from_array(*hasher.finalize().as_bytes())
}
