//! Publish/subscribe registry for pending-approval events.
//!
//! Route handlers publish through [`Notifier::broadcast`]; the SSE endpoint
//! hands each connected client its own receiver. The registry owns no route
//! state and routes own no registry internals.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    NewRegistration,
    UserApproved,
    UserRejected,
    LeaveRequested,
    PermissionRequested,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub payload: serde_json::Value,
}

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<NotificationEvent>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Notifier { tx }
    }

    /// Fans the event out to every live subscriber. Having no subscribers is
    /// not an error; the event is simply dropped.
    pub fn broadcast(&self, kind: EventKind, payload: serde_json::Value) {
        let event = NotificationEvent {
            id: Uuid::new_v4().to_string(),
            kind,
            payload,
        };
        if self.tx.send(event).is_err() {
            tracing::debug!(?kind, "No subscribers for notification event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn broadcast_reaches_every_subscriber() {
        let notifier = Notifier::new(16);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 2);

        notifier.broadcast(
            EventKind::NewRegistration,
            serde_json::json!({ "id": 7, "name": "Jane" }),
        );

        let got = first.recv().await.unwrap();
        assert_eq!(got.kind, EventKind::NewRegistration);
        assert_eq!(got.payload["name"], "Jane");
        assert_eq!(second.recv().await.unwrap().id, got.id);
    }

    #[actix_web::test]
    async fn broadcast_without_subscribers_is_a_noop() {
        let notifier = Notifier::new(4);
        notifier.broadcast(EventKind::UserApproved, serde_json::json!({ "id": 1 }));
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn event_kind_serializes_in_wire_form() {
        let event = NotificationEvent {
            id: "x".to_string(),
            kind: EventKind::LeaveRequested,
            payload: serde_json::Value::Null,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LEAVE_REQUESTED");
    }
}
