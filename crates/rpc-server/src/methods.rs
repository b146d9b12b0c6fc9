//! RPC Methods - JSON-RPC method handlers
//!
//! Implements the frenzy chain RPC methods.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use frenzy_program::{Frenzy, FrenzyStatus};
use frenzy_runtime::{FrenzyTransaction, RegistryStore, TransactionSender};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use solana_sdk::hash::Hash;
use std::sync::Arc;

/// RPC context shared across handlers
pub struct RpcContext {
    pub store: RegistryStore,
    pub tx_sender: TransactionSender,
    pub current_slot: Arc<RwLock<u64>>,
    pub current_blockhash: Arc<RwLock<Hash>>,
}

// ============ Request/Response Types ============

#[derive(Debug, Serialize, Deserialize)]
pub struct SendTransactionRequest {
    pub transaction: String, // Base64 encoded
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponseContext {
    pub slot: u64,
}

/// One frenzy, as reported to RPC callers
#[derive(Debug, Serialize, Deserialize)]
pub struct RpcFrenzy {
    #[serde(rename = "frenzyId")]
    pub frenzy_id: u64,
    #[serde(rename = "frenzyName")]
    pub frenzy_name: String,
    pub options: Vec<String>,
    pub status: String,
    pub creator: String,
    #[serde(rename = "endTime")]
    pub end_time: i64,
    #[serde(rename = "voteCounts")]
    pub vote_counts: Vec<u64>,
    pub voters: Vec<String>,
}

impl From<&Frenzy> for RpcFrenzy {
    fn from(frenzy: &Frenzy) -> Self {
        let status = match frenzy.status {
            FrenzyStatus::Inactive => "Inactive",
            FrenzyStatus::Active => "Active",
            FrenzyStatus::Completed => "Completed",
        };

        Self {
            frenzy_id: frenzy.id,
            frenzy_name: frenzy.name.clone(),
            options: frenzy.options.clone(),
            status: status.to_string(),
            creator: frenzy.creator.to_string(),
            end_time: frenzy.end_time,
            vote_counts: frenzy.vote_counts.clone(),
            voters: frenzy.voters.iter().map(|v| v.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetFrenziesResponse {
    pub context: RpcResponseContext,
    pub value: Vec<RpcFrenzy>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetFrenzyResponse {
    pub context: RpcResponseContext,
    pub value: Option<RpcFrenzy>,
}

// ============ RPC Handlers ============

/// Handle sendTransaction RPC method
pub fn handle_send_transaction(
    ctx: &RpcContext,
    params: SendTransactionRequest,
) -> Result<String, RpcError> {
    let tx_bytes = BASE64
        .decode(&params.transaction)
        .map_err(|_| RpcError::InvalidParams("Invalid base64 encoding".to_string()))?;

    let tx = FrenzyTransaction::from_bytes(&tx_bytes)
        .map_err(|_| RpcError::InvalidParams("Invalid transaction format".to_string()))?;

    // Envelope signature is checked at the door; registry-level rules are
    // enforced when the block producer applies the transaction.
    if !tx.verify() {
        return Err(RpcError::InvalidParams(
            "Invalid transaction signature".to_string(),
        ));
    }

    let hash = Hash::new_from_array(tx.compute_hash());

    ctx.tx_sender.send(tx).map_err(RpcError::InternalError)?;

    Ok(hash.to_string())
}

/// Handle getFrenzies RPC method (active frenzies only)
pub fn handle_get_frenzies(ctx: &RpcContext) -> Result<GetFrenziesResponse, RpcError> {
    let slot = *ctx.current_slot.read();
    let value = ctx
        .store
        .active_frenzies()
        .iter()
        .map(RpcFrenzy::from)
        .collect();

    Ok(GetFrenziesResponse {
        context: RpcResponseContext { slot },
        value,
    })
}

/// Handle getFrenzy RPC method
pub fn handle_get_frenzy(ctx: &RpcContext, id: u64) -> Result<GetFrenzyResponse, RpcError> {
    let slot = *ctx.current_slot.read();
    let value = ctx.store.get_frenzy(id).map(|f| RpcFrenzy::from(&f));

    Ok(GetFrenzyResponse {
        context: RpcResponseContext { slot },
        value,
    })
}

/// Handle getFrenzyCount RPC method
pub fn handle_get_frenzy_count(ctx: &RpcContext) -> Result<u64, RpcError> {
    Ok(ctx.store.frenzy_count())
}

/// Handle getFrenzyOptions RPC method
pub fn handle_get_frenzy_options(
    ctx: &RpcContext,
    id: u64,
) -> Result<Option<Vec<String>>, RpcError> {
    Ok(ctx.store.frenzy_options(id))
}

/// Handle getSlot RPC method
pub fn handle_get_slot(ctx: &RpcContext) -> Result<u64, RpcError> {
    Ok(*ctx.current_slot.read())
}

/// Handle getHealth RPC method
pub fn handle_get_health() -> Result<String, RpcError> {
    Ok("ok".to_string())
}

// ============ Error Types ============

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
}
