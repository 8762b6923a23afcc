//! BTreeMap-based compound index structures
//!
//! An index maps a compound key (one part per indexed field, identity
//! tie-break last) to the record identity. The tie-break makes every key
//! unique, so the tree is a total order over the collection.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use serde_json::Value;

use crate::executor::Document;
use crate::planner::{Cursor, SortOrder, SortSpec};

/// Index key representing a single field value.
///
/// Ordering is deterministic: Null < Bool < Number < String < Array < Object.
/// Missing fields index as Null.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKey {
    /// Null or missing value
    Null,
    /// Boolean value (false < true)
    Bool(bool),
    /// Number, ordered by its f64 bits. Integers the f64 cannot hold
    /// exactly keep their distance from it, so distinct integers past 2^53
    /// stay distinct and ordered.
    Number { ordered: u64, offset: i128 },
    /// String value
    String(String),
    /// Array, compared element by element
    Array(Vec<IndexKey>),
    /// Object, compared by its serialized form
    Object(String),
}

impl IndexKey {
    /// Create a key from a number
    ///
    /// Uses bit representation for total ordering.
    pub fn from_f64(v: f64) -> Self {
        // -0.0 and 0.0 index identically
        let v = if v == 0.0 { 0.0 } else { v };
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits // Negative: flip all bits
        } else {
            bits ^ (1 << 63) // Positive: flip sign bit
        };
        IndexKey::Number { ordered, offset: 0 }
    }

    /// Create a key from an integer without losing precision
    pub fn from_integer(v: i128) -> Self {
        let rounded = v as f64;
        match IndexKey::from_f64(rounded) {
            IndexKey::Number { ordered, .. } => IndexKey::Number {
                ordered,
                offset: v - rounded as i128,
            },
            other => other,
        }
    }

    pub fn from_string(v: impl Into<String>) -> Self {
        IndexKey::String(v.into())
    }

    /// Create a key from a JSON value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => IndexKey::Null,
            Value::Bool(b) => IndexKey::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    IndexKey::from_integer(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    IndexKey::from_integer(i128::from(u))
                } else {
                    IndexKey::from_f64(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => IndexKey::String(s.clone()),
            Value::Array(items) => IndexKey::Array(items.iter().map(IndexKey::from_json).collect()),
            Value::Object(_) => IndexKey::Object(value.to_string()),
        }
    }
}

/// One part of a compound key, ordered by its field's sort order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPart {
    key: IndexKey,
    order: SortOrder,
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order.apply(self.key.cmp(&other.key))
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compound key: parts compared in field precedence order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompoundKey(Vec<KeyPart>);

impl CompoundKey {
    /// Builds the key of `doc` for an index on `spec`
    pub fn from_document(doc: &Document, spec: &SortSpec) -> Self {
        CompoundKey(
            spec.keys()
                .iter()
                .map(|k| KeyPart {
                    key: IndexKey::from_json(doc.value_or_null(&k.field)),
                    order: k.order,
                })
                .collect(),
        )
    }

    /// Builds the key a cursor denotes on an index over `spec`.
    ///
    /// Caller checks that the cursor is keyed by `spec`'s fields.
    pub fn from_cursor(cursor: &Cursor, spec: &SortSpec) -> Self {
        CompoundKey(
            spec.keys()
                .iter()
                .zip(cursor.values())
                .map(|(k, v)| KeyPart {
                    key: IndexKey::from_json(v),
                    order: k.order,
                })
                .collect(),
        )
    }
}

/// A compound index over one sort specification
#[derive(Debug)]
pub struct IndexTree {
    /// Indexed fields and orders, tie-break included
    spec: SortSpec,
    /// Maps compound keys to record identities
    tree: BTreeMap<CompoundKey, IndexKey>,
}

impl IndexTree {
    /// Creates a new empty index on `spec`
    pub fn new(spec: SortSpec) -> Self {
        Self {
            spec,
            tree: BTreeMap::new(),
        }
    }

    pub fn spec(&self) -> &SortSpec {
        &self.spec
    }

    /// Index a record under its identity
    pub fn insert(&mut self, doc: &Document, id: IndexKey) {
        let key = CompoundKey::from_document(doc, &self.spec);
        self.tree.insert(key, id);
    }

    /// Remove a record's entry. The record must be given as it was indexed.
    pub fn remove(&mut self, doc: &Document) {
        let key = CompoundKey::from_document(doc, &self.spec);
        self.tree.remove(&key);
    }

    /// Identities within `(lower, upper)`, in index order or reversed
    pub fn scan<'a>(
        &'a self,
        lower: Bound<CompoundKey>,
        upper: Bound<CompoundKey>,
        reverse: bool,
    ) -> Box<dyn Iterator<Item = &'a IndexKey> + 'a> {
        // BTreeMap::range panics on inverted or doubly excluded equal bounds
        if let (
            Bound::Included(lo) | Bound::Excluded(lo),
            Bound::Included(hi) | Bound::Excluded(hi),
        ) = (&lower, &upper)
        {
            let empty = match lo.cmp(hi) {
                Ordering::Greater => true,
                Ordering::Equal => {
                    !matches!((&lower, &upper), (Bound::Included(_), Bound::Included(_)))
                }
                Ordering::Less => false,
            };
            if empty {
                return Box::new(std::iter::empty());
            }
        }

        let range = self.tree.range((lower, upper)).map(|(_, id)| id);
        if reverse {
            Box::new(range.rev())
        } else {
            Box::new(range)
        }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the number of indexed records
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
