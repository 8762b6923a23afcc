//! # Change Events
//!
//! One event per committed write, in commit order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of write that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    /// New record inserted
    Insert,
    /// Existing record replaced
    Update,
    /// Record removed
    Delete,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Insert => write!(f, "INSERT"),
            EventType::Update => write!(f, "UPDATE"),
            EventType::Delete => write!(f, "DELETE"),
        }
    }
}

/// A committed change to one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Monotonically increasing per publisher, starting at 1
    pub sequence: u64,

    pub event_type: EventType,

    pub collection: String,

    /// Identity value rendered as a string
    pub record_id: String,

    /// Record after the write (INSERT/UPDATE)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_data: Option<Value>,

    /// Record before the write (UPDATE/DELETE)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_data: Option<Value>,

    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create an INSERT event
    pub fn insert(sequence: u64, collection: &str, record_id: String, data: Value) -> Self {
        Self::new(sequence, EventType::Insert, collection, record_id, Some(data), None)
    }

    /// Create an UPDATE event
    pub fn update(
        sequence: u64,
        collection: &str,
        record_id: String,
        old_data: Value,
        new_data: Value,
    ) -> Self {
        Self::new(
            sequence,
            EventType::Update,
            collection,
            record_id,
            Some(new_data),
            Some(old_data),
        )
    }

    /// Create a DELETE event
    pub fn delete(sequence: u64, collection: &str, record_id: String, data: Value) -> Self {
        Self::new(sequence, EventType::Delete, collection, record_id, None, Some(data))
    }

    fn new(
        sequence: u64,
        event_type: EventType,
        collection: &str,
        record_id: String,
        new_data: Option<Value>,
        old_data: Option<Value>,
    ) -> Self {
        Self {
            sequence,
            event_type,
            collection: collection.to_string(),
            record_id,
            new_data,
            old_data,
            timestamp: Utc::now(),
        }
    }

    /// Topic string for this event
    pub fn topic(&self) -> String {
        format!("changes:{}", self.collection)
    }

    /// JSON message sent to subscribers
    pub fn to_wire_format(&self) -> Value {
        serde_json::json!({
            "type": "change",
            "topic": self.topic(),
            "sequence": self.sequence,
            "payload": {
                "event": self.event_type.to_string(),
                "collection": self.collection,
                "id": self.record_id,
                "new": self.new_data,
                "old": self.old_data,
                "commit_timestamp": self.timestamp.to_rfc3339(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_event() {
        let event = ChangeEvent::insert(1, "users", "u1".into(), json!({"name": "Ann"}));
        assert_eq!(event.event_type, EventType::Insert);
        assert!(event.new_data.is_some());
        assert!(event.old_data.is_none());
        assert_eq!(event.topic(), "changes:users");
    }

    #[test]
    fn test_update_carries_both_images() {
        let event = ChangeEvent::update(2, "users", "u1".into(), json!({"v": 1}), json!({"v": 2}));
        assert_eq!(event.old_data, Some(json!({"v": 1})));
        assert_eq!(event.new_data, Some(json!({"v": 2})));
    }

    #[test]
    fn test_wire_format() {
        let event = ChangeEvent::delete(3, "users", "u1".into(), json!({"v": 1}));
        let wire = event.to_wire_format();
        assert_eq!(wire["type"], "change");
        assert_eq!(wire["sequence"], 3);
        assert_eq!(wire["payload"]["event"], "DELETE");
        assert_eq!(wire["payload"]["new"], Value::Null);
        assert_eq!(wire["payload"]["old"]["v"], 1);
    }

    #[test]
    fn test_serde_skips_absent_images() {
        let event = ChangeEvent::insert(1, "users", "u1".into(), json!({}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event_type"], "INSERT");
        assert!(value.get("old_data").is_none());
    }
}
