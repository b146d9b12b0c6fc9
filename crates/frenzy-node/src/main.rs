//! Frenzy Chain Node
//!
//! Main entry point for the frenzy polling chain. Runs the block producer,
//! the HTTP/WebSocket RPC surface, and periodic state persistence. Registry
//! state survives restarts.

use anyhow::Result;
use clap::Parser;
use frenzy_runtime::{
    BlockProducer, BlockProducerConfig, ChainMetadata, FrenzyProcessor, PersistentStore,
    RegistryPersistence, RegistryStore,
};
use parking_lot::RwLock;
use rpc_server::{methods::RpcContext, HttpRpcServer, SubscriptionManager, WebSocketServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

/// Frenzy Chain Node
#[derive(Parser, Debug)]
#[command(name = "frenzyd")]
#[command(about = "Single-registry polling chain: create, start, vote, resolve", long_about = None)]
struct Args {
    /// HTTP RPC bind address
    #[arg(long, default_value = "127.0.0.1:8899")]
    rpc_addr: String,

    /// WebSocket bind address
    #[arg(long, default_value = "127.0.0.1:8900")]
    ws_addr: String,

    /// Block time in milliseconds
    #[arg(long, default_value = "400")]
    block_time_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Data directory for persistent state
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Save state every N slots (0 = only on shutdown)
    #[arg(long, default_value = "150")]
    save_interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Frenzy Chain node");
    tracing::info!("  HTTP RPC: {}", args.rpc_addr);
    tracing::info!("  WebSocket: {}", args.ws_addr);
    tracing::info!("  Block time: {}ms", args.block_time_ms);
    tracing::info!("  Data directory: {:?}", args.data_dir);
    tracing::info!("  Save interval: {} slots", args.save_interval);

    // Create data directory if it doesn't exist
    std::fs::create_dir_all(&args.data_dir)?;

    // Open persistent store
    let persistent_store = Arc::new(PersistentStore::open(&args.data_dir)?);

    // Initialize registry store and load existing state from disk
    let registry_store = RegistryStore::new();
    match persistent_store.load_metadata()? {
        Some(metadata) => {
            tracing::info!(
                "Loading state from disk: slot {}, {} frenzies",
                metadata.slot,
                metadata.frenzy_count
            );
            let loaded = registry_store.load_from_disk(&persistent_store)?;
            tracing::info!("Loaded {} frenzies from persistent storage", loaded);
        }
        None => {
            tracing::info!("No existing state found, starting fresh");
        }
    }

    // Initialize the transaction processor; the chain clock starts at the
    // wall-clock time of this boot.
    let processor = FrenzyProcessor::new(registry_store.clone(), chrono::Utc::now().timestamp());
    tracing::info!("Frenzy processor initialized");

    // Initialize block producer
    let block_config = BlockProducerConfig {
        block_time_ms: args.block_time_ms,
        verbose: args.verbose,
        ..Default::default()
    };
    let block_producer = BlockProducer::new(processor, block_config);

    // Get transaction sender and subscriber
    let tx_sender = block_producer.transaction_sender();
    let mut block_updates = block_producer.subscribe();

    // Initialize subscription manager for the event feed
    let subscription_manager = Arc::new(SubscriptionManager::new());

    // Set up RPC context
    let current_slot = Arc::new(RwLock::new(0u64));
    let current_blockhash = Arc::new(RwLock::new(solana_sdk::hash::Hash::default()));

    let rpc_context = Arc::new(RpcContext {
        store: registry_store.clone(),
        tx_sender,
        current_slot: current_slot.clone(),
        current_blockhash: current_blockhash.clone(),
    });

    // Spawn block producer
    let block_producer_handle = tokio::spawn(async move {
        block_producer.run_async().await;
    });

    // Spawn block update handler: event fan-out and periodic persistence
    let sub_mgr = subscription_manager.clone();
    let slot_ref = current_slot.clone();
    let hash_ref = current_blockhash.clone();
    let persist_store = persistent_store.clone();
    let persist_registry = registry_store.clone();
    let save_interval = args.save_interval;
    let update_handler = tokio::spawn(async move {
        while let Ok(update) = block_updates.recv().await {
            // Update current slot and blockhash
            *slot_ref.write() = update.slot;
            *hash_ref.write() = update.blockhash;

            // Notify event feed subscribers
            for event in &update.events {
                sub_mgr.notify_event(update.slot, event);
            }

            // Periodic save to disk
            if save_interval > 0 && update.slot % save_interval == 0 && update.slot > 0 {
                let metadata = ChainMetadata {
                    slot: update.slot,
                    blockhash: update.blockhash.to_bytes(),
                    frenzy_count: persist_registry.frenzy_count(),
                    last_save_ts: chrono::Utc::now().timestamp(),
                };
                if let Err(e) = persist_store.save_metadata(&metadata) {
                    tracing::error!("Failed to save metadata: {}", e);
                }
                if let Err(e) = persist_registry.save_to_disk(&persist_store) {
                    tracing::error!("Failed to save registry: {}", e);
                } else {
                    tracing::debug!("Saved state at slot {}", update.slot);
                }
            }
        }
    });

    // Start HTTP RPC server
    let http_context = rpc_context.clone();
    let http_addr = args.rpc_addr.clone();
    let http_server = tokio::spawn(async move {
        let server = HttpRpcServer::new(http_context);
        if let Err(e) = server.run(&http_addr).await {
            tracing::error!("HTTP RPC server error: {}", e);
        }
    });

    // Start WebSocket server
    let ws_sub_mgr = subscription_manager.clone();
    let ws_addr = args.ws_addr.clone();
    let ws_server = tokio::spawn(async move {
        let server = WebSocketServer::new(ws_sub_mgr);
        if let Err(e) = server.run(&ws_addr).await {
            tracing::error!("WebSocket server error: {}", e);
        }
    });

    tracing::info!("Frenzy Chain node running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");

    // Save state before shutdown
    let final_slot = *current_slot.read();
    let final_hash = *current_blockhash.read();
    tracing::info!("Saving final state at slot {}...", final_slot);

    let metadata = ChainMetadata {
        slot: final_slot,
        blockhash: final_hash.to_bytes(),
        frenzy_count: registry_store.frenzy_count(),
        last_save_ts: chrono::Utc::now().timestamp(),
    };

    if let Err(e) = persistent_store.save_metadata(&metadata) {
        tracing::error!("Failed to save final metadata: {}", e);
    }
    if let Err(e) = registry_store.save_to_disk(&persistent_store) {
        tracing::error!("Failed to save final state: {}", e);
    } else {
        tracing::info!(
            "Final state saved: {} frenzies at slot {}",
            registry_store.frenzy_count(),
            final_slot
        );
    }

    // Abort tasks
    block_producer_handle.abort();
    update_handler.abort();
    http_server.abort();
    ws_server.abort();

    tracing::info!("Node stopped");

    Ok(())
}
