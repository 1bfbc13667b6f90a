//! Fan-out of settlement events to in-process listeners.
//!
//! The state machines publish only after their transaction commits, so a
//! listener never sees a booking or status change that was rolled back.
//! Delivery is best effort: with no listener the event is dropped, and a
//! listener that falls more than the channel capacity behind loses the
//! oldest events.

use chrono::{DateTime, Utc};
use ecoride_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

/// Event type names, seeded into `event_types` by the migrations.
pub mod names {
    pub const BOOKING_CONFIRMED: &str = "booking.confirmed";
    pub const BOOKING_CANCELLED: &str = "booking.cancelled";
    pub const RIDE_PUBLISHED: &str = "ride.published";
    pub const RIDE_STARTED: &str = "ride.started";
    pub const RIDE_FINISHED: &str = "ride.finished";
    pub const RIDE_CANCELLED: &str = "ride.cancelled";
}

/// Something that happened to a ride or booking.
///
/// `source_entity_type`/`source_entity_id` name the row it happened to
/// (`"ride"` or `"booking"`); `actor_user_id` is whoever caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    /// Event-specific details such as refunded amounts.
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        Self {
            source_entity_type: Some(entity_type.into()),
            source_entity_id: Some(entity_id),
            ..self
        }
    }

    pub fn with_actor(self, user_id: DbId) -> Self {
        Self {
            actor_user_id: Some(user_id),
            ..self
        }
    }

    pub fn with_payload(self, payload: Value) -> Self {
        Self { payload, ..self }
    }
}

/// Events buffered per listener before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 1024;

/// Shared as `Arc<EventBus>` by the engines and the persistence task.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    pub fn publish(&self, event: PlatformEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No event listeners; event dropped");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listener_receives_the_full_envelope() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = PlatformEvent::new(names::RIDE_CANCELLED)
            .with_source("ride", 42)
            .with_actor(7)
            .with_payload(serde_json::json!({"refunded": 2}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "ride.cancelled");
        assert_eq!(received.source_entity_type.as_deref(), Some("ride"));
        assert_eq!(received.source_entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["refunded"], 2);
    }

    #[tokio::test]
    async fn every_listener_gets_its_own_copy() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(PlatformEvent::new(names::BOOKING_CONFIRMED));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, "booking.confirmed");
        assert_eq!(e2.event_type, "booking.confirmed");
    }

    #[test]
    fn publishing_without_listeners_is_harmless() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new(names::RIDE_STARTED));
    }

    #[tokio::test]
    async fn slow_listener_lags_instead_of_blocking() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..3 {
            bus.publish(PlatformEvent::new(names::RIDE_STARTED));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
    }

    #[test]
    fn bare_event_has_no_source_or_actor() {
        let event = PlatformEvent::new(names::RIDE_FINISHED);
        assert!(event.source_entity_type.is_none());
        assert!(event.source_entity_id.is_none());
        assert!(event.actor_user_id.is_none());
        assert!(event.payload.is_object());
    }
}
