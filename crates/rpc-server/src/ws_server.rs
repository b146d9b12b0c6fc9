//! WebSocket Server
//!
//! Provides the WebSocket endpoint for registry event subscriptions.

use crate::subscriptions::{EventNotification, SubscriptionManager};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::mpsc,
};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// WebSocket JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct WsJsonRpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// WebSocket Server
pub struct WebSocketServer {
    subscription_manager: Arc<SubscriptionManager>,
}

impl WebSocketServer {
    /// Create a new WebSocket server
    pub fn new(subscription_manager: Arc<SubscriptionManager>) -> Self {
        Self {
            subscription_manager,
        }
    }

    /// Run the WebSocket server
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("WebSocket server listening on {}", addr);

        let subscription_manager = self.subscription_manager;

        while let Ok((stream, peer_addr)) = listener.accept().await {
            let sub_mgr = subscription_manager.clone();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, sub_mgr).await {
                    tracing::warn!("WebSocket connection error from {}: {}", peer_addr, e);
                }
            });
        }

        Ok(())
    }
}

/// Handle a single WebSocket connection
async fn handle_connection(
    stream: TcpStream,
    subscription_manager: Arc<SubscriptionManager>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    let (ws_sender, mut ws_receiver) = ws_stream.split();

    // One writer task per connection; responses and notifications both go
    // through this channel so the sink has a single owner.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        use futures::SinkExt;
        let mut ws_sender = ws_sender;
        while let Some(text) = out_rx.recv().await {
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let mut active_subscriptions: Vec<u64> = Vec::new();

    while let Some(msg) = ws_receiver.next().await {
        let msg = msg?;

        if let Message::Text(text) = msg {
            let request: WsJsonRpcRequest = match serde_json::from_str(&text) {
                Ok(req) => req,
                Err(_) => continue,
            };

            let response = handle_ws_method(
                &subscription_manager,
                &request,
                &mut active_subscriptions,
                &out_tx,
            );

            if out_tx.send(response.to_string()).is_err() {
                break;
            }
        }
    }

    // Clean up subscriptions on disconnect
    for sub_id in active_subscriptions {
        subscription_manager.unsubscribe(sub_id);
    }
    writer.abort();

    Ok(())
}

/// Handle WebSocket JSON-RPC method
fn handle_ws_method(
    subscription_manager: &Arc<SubscriptionManager>,
    request: &WsJsonRpcRequest,
    active_subscriptions: &mut Vec<u64>,
    out_tx: &mpsc::UnboundedSender<String>,
) -> Value {
    match request.method.as_str() {
        "eventSubscribe" => {
            let (sub_id, mut receiver) = subscription_manager.subscribe_events();
            active_subscriptions.push(sub_id);

            // Forward notifications until the subscription or the
            // connection goes away.
            let out = out_tx.clone();
            tokio::spawn(async move {
                while let Ok(notification) = receiver.recv().await {
                    let msg = format_event_notification(&notification);
                    if out.send(msg.to_string()).is_err() {
                        break;
                    }
                }
            });

            json!({
                "jsonrpc": "2.0",
                "id": request.id,
                "result": sub_id
            })
        }

        "eventUnsubscribe" => {
            let params: Vec<Value> =
                serde_json::from_value(request.params.clone()).unwrap_or_default();
            let sub_id = params.first().and_then(|v| v.as_u64());

            match sub_id {
                Some(id) => {
                    let success = subscription_manager.unsubscribe(id);
                    if success {
                        active_subscriptions.retain(|&s| s != id);
                    }
                    json!({
                        "jsonrpc": "2.0",
                        "id": request.id,
                        "result": success
                    })
                }
                None => error_response(&request.id, -32602, "Missing subscription ID"),
            }
        }

        _ => error_response(
            &request.id,
            -32601,
            &format!("Method not found: {}", request.method),
        ),
    }
}

/// Create error response
fn error_response(id: &Value, code: i32, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Format a registry event notification for WebSocket delivery
pub fn format_event_notification(notification: &EventNotification) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "frenzyNotification",
        "params": {
            "result": {
                "context": {
                    "slot": notification.slot
                },
                "value": notification.event
            },
            "subscription": notification.subscription_id
        }
    })
}
