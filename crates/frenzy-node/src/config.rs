//! Node Configuration

use serde::{Deserialize, Serialize};

/// Node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// HTTP RPC bind address
    pub rpc_addr: String,
    /// WebSocket bind address
    pub ws_addr: String,
    /// Block time in milliseconds
    pub block_time_ms: u64,
    /// Save state every N slots (0 = only on shutdown)
    pub save_interval: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_addr: "127.0.0.1:8899".to_string(),
            ws_addr: "127.0.0.1:8900".to_string(),
            block_time_ms: 400,
            save_interval: 150,
        }
    }
}
