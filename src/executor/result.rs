//! Record and page result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::planner::{Cursor, Projection, SearchRequest, SortSpec};

static NULL: Value = Value::Null;

/// A single record: a JSON object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value; `None` unless it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field addressed by a dotted path (`address.city`)
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Field addressed by a dotted path; missing fields read as null
    pub fn value_or_null(&self, path: &str) -> &Value {
        self.get_path(path).unwrap_or(&NULL)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Top-level field names
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Copies only the projected fields. Dotted paths keep their whole
    /// top-level field.
    pub fn project(&self, projection: &Projection) -> Document {
        let mut fields = Map::new();
        for path in projection.fields() {
            let top = path.split('.').next().unwrap_or(path);
            if let Some(value) = self.fields.get(top) {
                fields.insert(top.to_string(), value.clone());
            }
        }
        Document { fields }
    }

    /// Cursor holding this record's values for every field of `keys`, in
    /// key order
    pub fn cursor_for(&self, keys: &SortSpec) -> Cursor {
        Cursor::new(
            keys.fields()
                .map(|f| (f.to_string(), self.value_or_null(f).clone())),
        )
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// A fully formed request fetching an adjacent page
pub type PageLink = SearchRequest;

/// One page of records plus links to its neighbours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Records in caller sort order, at most `count`
    pub records: Vec<Document>,
    /// Link to the preceding page in caller order
    pub previous: Option<PageLink>,
    /// Link to the following page in caller order
    pub next: Option<PageLink>,
}

impl PageResult {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            previous: None,
            next: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}
