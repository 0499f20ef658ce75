use aerodesk_shared::models::{
    BookingCancelledEvent, BookingConfirmedEvent, BOOKING_CANCELLED_TOPIC, BOOKING_CONFIRMED_TOPIC,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::RepositoryError;

/// Outbound port for domain events (Kafka in production, the log otherwise).
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), RepositoryError>;
}

/// Writes events to the tracing log instead of a broker.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventPublisher;

#[async_trait]
impl EventPublisher for LogEventPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), RepositoryError> {
        info!(topic, key, payload, "event published");
        Ok(())
    }
}

/// Topic an event type is published on.
pub trait DomainEvent: Serialize {
    const TOPIC: &'static str;

    fn key(&self) -> String;
}

impl DomainEvent for BookingConfirmedEvent {
    const TOPIC: &'static str = BOOKING_CONFIRMED_TOPIC;

    fn key(&self) -> String {
        self.booking_id.to_string()
    }
}

impl DomainEvent for BookingCancelledEvent {
    const TOPIC: &'static str = BOOKING_CANCELLED_TOPIC;

    fn key(&self) -> String {
        self.booking_id.to_string()
    }
}

/// Best effort: the booking has already committed, so a failed publish is only logged.
pub(crate) async fn publish_event<E: DomainEvent + Sync>(publisher: &dyn EventPublisher, event: &E) {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(topic = E::TOPIC, error = %e, "failed to serialize event");
            return;
        }
    };

    if let Err(e) = publisher.publish(E::TOPIC, &event.key(), &payload).await {
        warn!(topic = E::TOPIC, error = %e, "failed to publish event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Records every published event.
    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), RepositoryError> {
            self.events
                .lock()
                .unwrap()
                .push((topic.to_string(), key.to_string(), payload.to_string()));
            Ok(())
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _topic: &str, _key: &str, _payload: &str) -> Result<(), RepositoryError> {
            Err("broker unavailable".into())
        }
    }

    fn cancelled_event() -> BookingCancelledEvent {
        BookingCancelledEvent {
            booking_id: Uuid::new_v4(),
            flight_id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            released_seats: vec!["E4".to_string()],
            timestamp: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn test_publish_uses_topic_and_booking_key() {
        let publisher = RecordingPublisher::default();
        let event = cancelled_event();
        publish_event(&publisher, &event).await;

        let events = publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "booking.cancelled");
        assert_eq!(events[0].1, event.booking_id.to_string());
        assert!(events[0].2.contains("E4"));
    }

    #[tokio::test]
    async fn test_publish_failure_is_swallowed() {
        publish_event(&FailingPublisher, &cancelled_event()).await;
    }
}
