//! # Change Publisher
//!
//! Fan-out of change events over a bounded broadcast channel.
//!
//! Delivery is best effort: a subscriber that falls more than the
//! channel capacity behind skips the oldest events and is told how many.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::broadcast;

use super::errors::{RealtimeError, RealtimeResult};
use super::event::ChangeEvent;
use crate::observability::{log_event, Event};

/// Publishes change events to every live subscriber
#[derive(Debug)]
pub struct ChangePublisher {
    sender: broadcast::Sender<ChangeEvent>,
    sequence: AtomicU64,
}

impl ChangePublisher {
    /// Creates a publisher buffering at most `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            sequence: AtomicU64::new(0),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn publish_insert(&self, collection: &str, record_id: String, data: Value) -> ChangeEvent {
        self.publish(ChangeEvent::insert(self.next_sequence(), collection, record_id, data))
    }

    pub fn publish_update(
        &self,
        collection: &str,
        record_id: String,
        old_data: Value,
        new_data: Value,
    ) -> ChangeEvent {
        self.publish(ChangeEvent::update(
            self.next_sequence(),
            collection,
            record_id,
            old_data,
            new_data,
        ))
    }

    pub fn publish_delete(&self, collection: &str, record_id: String, data: Value) -> ChangeEvent {
        self.publish(ChangeEvent::delete(self.next_sequence(), collection, record_id, data))
    }

    /// Sends an event. Having no subscribers is not an error.
    fn publish(&self, event: ChangeEvent) -> ChangeEvent {
        let receivers = self.sender.send(event.clone()).unwrap_or(0);

        let event_type = event.event_type.to_string();
        let sequence = event.sequence.to_string();
        let receivers = receivers.to_string();
        log_event(
            Event::ChangePublished,
            &[
                ("collection", event.collection.as_str()),
                ("event_type", event_type.as_str()),
                ("receivers", receivers.as_str()),
                ("sequence", sequence.as_str()),
            ],
        );
        event
    }

    /// Subscribes to events published from now on
    pub fn subscribe(&self) -> ChangeSubscriber {
        ChangeSubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sequence of the last published event, 0 if none
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl Default for ChangePublisher {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Receiving end of a change stream
#[derive(Debug)]
pub struct ChangeSubscriber {
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl ChangeSubscriber {
    /// Waits for the next event
    pub async fn recv(&mut self) -> RealtimeResult<ChangeEvent> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => RealtimeError::Closed,
            broadcast::error::RecvError::Lagged(n) => RealtimeError::Lagged(n),
        })
    }

    /// Returns the next event if one is already buffered
    pub fn try_recv(&mut self) -> Option<RealtimeResult<ChangeEvent>> {
        match self.receiver.try_recv() {
            Ok(event) => Some(Ok(event)),
            Err(broadcast::error::TryRecvError::Empty) => None,
            Err(broadcast::error::TryRecvError::Closed) => Some(Err(RealtimeError::Closed)),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Some(Err(RealtimeError::Lagged(n))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::EventType;
    use serde_json::json;

    #[test]
    fn test_publish_without_subscribers() {
        let publisher = ChangePublisher::new(4);
        let event = publisher.publish_insert("users", "u1".into(), json!({}));
        assert_eq!(event.sequence, 1);
        assert_eq!(publisher.last_sequence(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_receives_in_order() {
        let publisher = ChangePublisher::new(8);
        let mut subscriber = publisher.subscribe();

        publisher.publish_insert("users", "u1".into(), json!({"v": 1}));
        publisher.publish_update("users", "u1".into(), json!({"v": 1}), json!({"v": 2}));
        publisher.publish_delete("users", "u1".into(), json!({"v": 2}));

        let first = subscriber.recv().await.unwrap();
        let second = subscriber.recv().await.unwrap();
        let third = subscriber.recv().await.unwrap();

        assert_eq!(
            [first.sequence, second.sequence, third.sequence],
            [1, 2, 3]
        );
        assert_eq!(first.event_type, EventType::Insert);
        assert_eq!(second.event_type, EventType::Update);
        assert_eq!(third.event_type, EventType::Delete);
        assert!(subscriber.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagging_subscriber_told_how_many_skipped() {
        let publisher = ChangePublisher::new(2);
        let mut subscriber = publisher.subscribe();

        for i in 0..5 {
            publisher.publish_insert("users", format!("u{}", i), json!({}));
        }

        assert_eq!(subscriber.recv().await, Err(RealtimeError::Lagged(3)));
        assert_eq!(subscriber.recv().await.unwrap().sequence, 4);
    }

    #[tokio::test]
    async fn test_closed_when_publisher_dropped() {
        let publisher = ChangePublisher::new(2);
        let mut subscriber = publisher.subscribe();
        drop(publisher);
        assert_eq!(subscriber.recv().await, Err(RealtimeError::Closed));
    }
}
