//! Store event distribution
//!
//! An in-process bus that tells subscribers a new snapshot was published.
//! Built on `tokio::sync::broadcast`: emitting never blocks, events are
//! dropped immediately when nobody subscribes, and a lagging subscriber
//! loses oldest events rather than stalling dispatch.
//!
//! Events carry the applied action's tag, not the snapshot itself;
//! subscribers read the current state from the store, which is guaranteed
//! to reflect the action before the event is emitted.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<StoreEvent>;

/// Bus distributing store events to any number of subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a new event bus with the specified per-subscriber capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers (non-blocking)
    pub fn emit(&self, event: StoreEvent) {
        // send() errs when no receivers exist; dropping the event is fine
        let _ = self.sender.send(event);
    }

    /// Number of active subscribers; for diagnostics, not control flow
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events published by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// An action was applied; `kind` is the action's serde tag
    ActionApplied { kind: String },

    /// The whole snapshot was swapped out (e.g. a seed file was loaded)
    SnapshotReplaced,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_emission_and_subscription() {
        let bus = EventBus::new(10);
        let mut receiver = bus.subscribe();

        bus.emit(StoreEvent::ActionApplied {
            kind: "create_order".to_string(),
        });

        let received = receiver.recv().await.unwrap();
        assert_eq!(
            received,
            StoreEvent::ActionApplied {
                kind: "create_order".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_receive() {
        let bus = EventBus::new(10);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.emit(StoreEvent::SnapshotReplaced);

        assert_eq!(first.recv().await.unwrap(), StoreEvent::SnapshotReplaced);
        assert_eq!(second.recv().await.unwrap(), StoreEvent::SnapshotReplaced);
    }

    #[tokio::test]
    async fn test_emit_with_no_subscribers_does_not_block() {
        let bus = EventBus::new(10);
        bus.emit(StoreEvent::ActionApplied {
            kind: "unknown".to_string(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _first = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_serialization() {
        let event = StoreEvent::ActionApplied {
            kind: "set_logistics_details".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("action_applied"));
        assert!(json.contains("set_logistics_details"));

        let back: StoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
