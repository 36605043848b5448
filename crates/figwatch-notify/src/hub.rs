//! In-memory fan-out hub for live WebSocket subscribers.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

struct Subscriber {
    id: Uuid,
    tx: UnboundedSender<String>,
}

/// Holds the live subscriber set and pushes serialized events to all of
/// them. A subscriber whose receiving end is gone is pruned on the next
/// broadcast; one dead connection never blocks delivery to the rest.
#[derive(Default)]
pub struct BroadcastHub {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl BroadcastHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and hand back its id and event stream.
    pub fn connect(&self) -> (Uuid, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.lock().push(Subscriber { id, tx });
        tracing::debug!(subscriber_id = %id, "subscriber connected");
        (id, rx)
    }

    /// Remove a subscriber; safe to call for an already-pruned id.
    pub fn disconnect(&self, id: Uuid) {
        self.lock().retain(|s| s.id != id);
        tracing::debug!(subscriber_id = %id, "subscriber disconnected");
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Push `{type, data, timestamp}` to every subscriber.
    ///
    /// The event is serialized once. Sends that fail (receiver dropped) are
    /// collected during the pass and the dead subscribers pruned after it
    /// completes. Returns the number of successful deliveries.
    pub fn broadcast(&self, event_type: &str, data: Value) -> usize {
        let event = json!({
            "type": event_type,
            "data": data,
            "timestamp": Utc::now().to_rfc3339(),
        })
        .to_string();

        let mut subscribers = self.lock();
        let mut dead: Vec<Uuid> = Vec::new();
        let mut delivered = 0;

        for subscriber in subscribers.iter() {
            if subscriber.tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(subscriber.id);
            }
        }

        if !dead.is_empty() {
            subscribers.retain(|s| !dead.contains(&s.id));
            tracing::debug!(pruned = dead.len(), "pruned dead subscribers");
        }

        delivered
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscriber>> {
        // A poisoned lock only means a panic elsewhere; the subscriber list
        // itself stays usable.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
