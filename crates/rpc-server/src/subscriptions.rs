//! Subscription Manager - Manages WebSocket subscriptions
//!
//! Tracks event subscriptions and fans registry notifications out to
//! subscribers.

use dashmap::DashMap;
use frenzy_program::FrenzyEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Subscription ID
pub type SubscriptionId = u64;

/// Registry event notification
#[derive(Clone, Debug)]
pub struct EventNotification {
    pub subscription_id: SubscriptionId,
    pub slot: u64,
    pub event: FrenzyEvent,
}

/// Subscription entry
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub sender: broadcast::Sender<EventNotification>,
}

/// Manages WebSocket subscriptions
pub struct SubscriptionManager {
    /// Active subscriptions by ID
    subscriptions: DashMap<SubscriptionId, Subscription>,
    /// Next subscription ID
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to registry events
    pub fn subscribe_events(&self) -> (SubscriptionId, broadcast::Receiver<EventNotification>) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = broadcast::channel(64);

        self.subscriptions.insert(id, Subscription { id, sender });

        tracing::debug!("Created event subscription {}", id);

        (id, receiver)
    }

    /// Unsubscribe; returns whether the subscription existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Fan one registry event out to every subscriber
    pub fn notify_event(&self, slot: u64, event: &FrenzyEvent) {
        for entry in self.subscriptions.iter() {
            let notification = EventNotification {
                subscription_id: entry.id,
                slot,
                event: event.clone(),
            };
            // A lagging or dropped receiver is the connection task's problem.
            let _ = entry.sender.send(notification);
        }
    }

    /// Number of active subscriptions
    pub fn active_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
