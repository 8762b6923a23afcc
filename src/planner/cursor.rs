//! Resumption cursors
//!
//! A cursor holds a boundary record's values for every hint field, in hint
//! order. Callers only ever round-trip it: on the wire it is a base64url
//! token of its JSON form.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ast::SortSpec;
use super::errors::{PlannerError, PlannerResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CursorEntry {
    field: String,
    value: Value,
}

/// Opaque resumption marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cursor {
    entries: Vec<CursorEntry>,
}

impl Cursor {
    /// Builds a cursor from ordered (field, value) pairs
    pub fn new(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(field, value)| CursorEntry { field, value })
                .collect(),
        }
    }

    /// Field names in key order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.field.as_str())
    }

    /// Values in key order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Value recorded for a field
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the cursor is keyed by exactly the spec's fields, in order
    pub fn matches(&self, spec: &SortSpec) -> bool {
        self.entries.len() == spec.len() && self.fields().zip(spec.fields()).all(|(a, b)| a == b)
    }

    /// Encodes the cursor as an opaque token
    pub fn encode(&self) -> String {
        // Serializing a Vec of string/Value pairs cannot fail
        let json = serde_json::to_vec(&self.entries).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decodes a token produced by [`Cursor::encode`]
    pub fn decode(token: &str) -> PlannerResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| PlannerError::cursor_invalid(format!("bad encoding: {}", e)))?;
        let entries: Vec<CursorEntry> = serde_json::from_slice(&bytes)
            .map_err(|e| PlannerError::cursor_invalid(format!("bad payload: {}", e)))?;
        if entries.is_empty() {
            return Err(PlannerError::cursor_invalid("cursor has no keys"));
        }
        Ok(Self { entries })
    }
}

impl TryFrom<String> for Cursor {
    type Error = PlannerError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Cursor::decode(&token)
    }
}

impl From<Cursor> for String {
    fn from(cursor: Cursor) -> Self {
        cursor.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ast::SortKey;
    use serde_json::json;

    fn sample() -> Cursor {
        Cursor::new(vec![
            ("age".to_string(), json!(42)),
            ("_id".to_string(), json!("user_7")),
        ])
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = sample().encode();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(Cursor::decode(&token).unwrap(), sample());
    }

    #[test]
    fn test_key_order_preserved() {
        let cursor = sample();
        let fields: Vec<&str> = cursor.fields().collect();
        assert_eq!(fields, vec!["age", "_id"]);
        assert_eq!(cursor.value("_id"), Some(&json!("user_7")));
    }

    #[test]
    fn test_matches_hint_fields() {
        let hint = SortSpec::asc("age").then(SortKey::asc("_id"));
        assert!(sample().matches(&hint));
        assert!(sample().matches(&hint.inverted()));
        assert!(!sample().matches(&SortSpec::asc("age")));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = Cursor::decode("not*a*token").unwrap_err();
        assert_eq!(err.code().code(), "AERO_PAGE_CURSOR_INVALID");

        let empty = URL_SAFE_NO_PAD.encode(b"[]");
        assert!(Cursor::decode(&empty).is_err());
    }

    #[test]
    fn test_serde_uses_token() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.is_string());
        let back: Cursor = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }
}
