//! Push-notification channel for UI clients
//!
//! A single process-wide broadcast channel fans row-change events out to
//! every open WebSocket. Delivery is best-effort and at-most-once: there is
//! no acknowledgement or backlog, and a disconnected client simply misses
//! updates.

use serde::Serialize;
use tokio::sync::broadcast;

/// Kinds of row-change events pushed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OrderCreated,
    OrderUpdated,
    MachineUpdated,
    RouteCreated,
    RouteUpdated,
    StopUpdated,
}

/// Wire envelope: `{ "type": <kind>, "data": <row snapshot> }`
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: serde_json::Value,
}

/// Cloneable handle to the broadcast channel
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<Event>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Publish an event to all connected clients. Send errors (no
    /// subscribers) are ignored.
    pub fn publish<T: Serialize>(&self, kind: EventKind, data: &T) {
        match serde_json::to_value(data) {
            Ok(value) => {
                let _ = self.tx.send(Event { kind, data: value });
            }
            Err(e) => {
                tracing::warn!(?kind, error = %e, "Failed to serialize event payload");
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn envelope_uses_type_and_data_keys() {
        let broadcaster = EventBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();
        broadcaster.publish(EventKind::OrderCreated, &serde_json::json!({"id": 1}));

        let event = rx.recv().await.unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "order_created");
        assert_eq!(json["data"]["id"], 1);
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let broadcaster = EventBroadcaster::new(8);
        broadcaster.publish(EventKind::MachineUpdated, &serde_json::json!({}));
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
