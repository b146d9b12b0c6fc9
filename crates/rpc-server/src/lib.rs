//! RPC Server - JSON-RPC and WebSocket for the frenzy chain
//!
//! The surface external callers use to drive the registry:
//! - HTTP JSON-RPC: sendTransaction, getFrenzies, getFrenzy, getFrenzyCount,
//!   getFrenzyOptions, getSlot, getHealth
//! - WebSocket: eventSubscribe / eventUnsubscribe for registry notifications

pub mod http_server;
pub mod methods;
pub mod subscriptions;
pub mod ws_server;

pub use http_server::HttpRpcServer;
pub use methods::RpcContext;
pub use subscriptions::SubscriptionManager;
pub use ws_server::WebSocketServer;

// Re-export types that consumers might need
pub use frenzy_runtime::{BlockUpdate, TransactionSender};

/// RPC Server configuration
#[derive(Clone, Debug)]
pub struct RpcServerConfig {
    /// HTTP RPC bind address
    pub http_addr: String,
    /// WebSocket bind address
    pub ws_addr: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:8899".to_string(),
            ws_addr: "127.0.0.1:8900".to_string(),
            verbose: false,
        }
    }
}
