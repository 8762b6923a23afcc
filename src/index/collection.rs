//! In-memory indexed collection
//!
//! Records are keyed by their identity field. Every compound index is kept
//! in step with every write, and each index also serves its inverted order
//! by walking backwards.
//!
//! # API
//!
//! - `ensure_index(spec)` - Provision a compound index (idempotent)
//! - `insert(doc)` / `replace(doc)` / `remove(id)` / `get(id)`
//! - `find(query)` - Hinted, bounded read (`PageStore`)

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use serde_json::Value;

use super::btree::{CompoundKey, IndexKey, IndexTree};
use super::errors::{IndexError, IndexResult};
use crate::executor::{
    Document, PageStore, PredicateFilter, ResultSorter, StoreError, StoreQuery, StoreResult,
};
use crate::planner::{KeyBound, KeyRange, SortSpec};

#[derive(Debug, Default)]
struct CollectionState {
    documents: BTreeMap<IndexKey, Document>,
    indexes: Vec<IndexTree>,
}

impl CollectionState {
    /// Index serving `hint`, and whether it is walked backwards
    fn resolve_hint(&self, hint: &SortSpec) -> Option<(&IndexTree, bool)> {
        self.indexes.iter().find_map(|index| {
            if index.spec() == hint {
                Some((index, false))
            } else if index.spec().inverted() == *hint {
                Some((index, true))
            } else {
                None
            }
        })
    }
}

/// In-memory collection with compound indexes
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    id_field: String,
    state: RwLock<CollectionState>,
}

impl MemoryCollection {
    /// Creates an empty collection keyed by `id_field`
    pub fn new(name: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_field: id_field.into(),
            state: RwLock::new(CollectionState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Provisions an index on `spec` plus the identity tie-break.
    ///
    /// Returns false when an index already serves the spec in either order.
    pub fn ensure_index(&self, spec: &SortSpec) -> IndexResult<bool> {
        if spec.is_empty() {
            return Err(IndexError::invalid_spec("Index must name at least one field"));
        }

        let full = spec.with_tiebreak(&self.id_field);
        let mut state = self.state.write().map_err(|_| IndexError::unavailable())?;

        if state.resolve_hint(&full).is_some() {
            return Ok(false);
        }

        let mut index = IndexTree::new(full);
        for (id, doc) in &state.documents {
            index.insert(doc, id.clone());
        }
        state.indexes.push(index);
        Ok(true)
    }

    /// Specifications of every provisioned index
    pub fn indexes(&self) -> IndexResult<Vec<SortSpec>> {
        let state = self.state.read().map_err(|_| IndexError::unavailable())?;
        Ok(state.indexes.iter().map(|i| i.spec().clone()).collect())
    }

    /// Inserts a new record
    pub fn insert(&self, doc: Document) -> IndexResult<()> {
        let id = self.identity(&doc)?;
        let mut state = self.state.write().map_err(|_| IndexError::unavailable())?;

        if state.documents.contains_key(&id) {
            return Err(IndexError::duplicate_id(doc.value_or_null(&self.id_field)));
        }

        for index in &mut state.indexes {
            index.insert(&doc, id.clone());
        }
        state.documents.insert(id, doc);
        Ok(())
    }

    /// Replaces an existing record, returning the previous version
    pub fn replace(&self, doc: Document) -> IndexResult<Document> {
        let id = self.identity(&doc)?;
        let mut state = self.state.write().map_err(|_| IndexError::unavailable())?;

        let old = match state.documents.remove(&id) {
            Some(old) => old,
            None => return Err(IndexError::not_found(doc.value_or_null(&self.id_field))),
        };

        for index in &mut state.indexes {
            index.remove(&old);
            index.insert(&doc, id.clone());
        }
        state.documents.insert(id, doc);
        Ok(old)
    }

    /// Removes a record, returning it
    pub fn remove(&self, id: &Value) -> IndexResult<Document> {
        let key = IndexKey::from_json(id);
        let mut state = self.state.write().map_err(|_| IndexError::unavailable())?;

        let old = match state.documents.remove(&key) {
            Some(old) => old,
            None => return Err(IndexError::not_found(id)),
        };

        for index in &mut state.indexes {
            index.remove(&old);
        }
        Ok(old)
    }

    /// Looks up a record by identity
    pub fn get(&self, id: &Value) -> IndexResult<Option<Document>> {
        let state = self.state.read().map_err(|_| IndexError::unavailable())?;
        Ok(state.documents.get(&IndexKey::from_json(id)).cloned())
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.documents.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn identity(&self, doc: &Document) -> IndexResult<IndexKey> {
        match doc.get(&self.id_field) {
            None | Some(Value::Null) => Err(IndexError::missing_id(&self.id_field)),
            Some(id) => Ok(IndexKey::from_json(id)),
        }
    }

    /// Translates a range expressed in `range.order` into bounds over
    /// `index`'s key order
    fn bounds(
        range: &KeyRange,
        index: &IndexTree,
        hint: &SortSpec,
    ) -> StoreResult<(Bound<CompoundKey>, Bound<CompoundKey>)> {
        if range.cursors().any(|c| !c.matches(hint)) {
            return Err(StoreError::bad_cursor(hint));
        }

        let spec = index.spec();
        let convert = |bound: &KeyBound| match bound {
            KeyBound::Unbounded => Bound::Unbounded,
            KeyBound::Inclusive(c) => Bound::Included(CompoundKey::from_cursor(c, spec)),
            KeyBound::Exclusive(c) => Bound::Excluded(CompoundKey::from_cursor(c, spec)),
        };

        if range.order == *spec {
            Ok((convert(&range.lower), convert(&range.upper)))
        } else if range.order.inverted() == *spec {
            Ok((convert(&range.upper), convert(&range.lower)))
        } else {
            Err(StoreError::query_failed(format!(
                "Range order {} does not match index {}",
                range.order, spec
            )))
        }
    }
}

impl PageStore for MemoryCollection {
    fn find(&self, query: &StoreQuery) -> StoreResult<Vec<Document>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }

        let state = self
            .state
            .read()
            .map_err(|_| StoreError::unavailable("Collection lock poisoned"))?;

        let (index, reverse) = state
            .resolve_hint(&query.hint)
            .ok_or_else(|| StoreError::bad_hint(&query.hint))?;

        let (lower, upper) = match &query.range {
            Some(range) => Self::bounds(range, index, &query.hint)?,
            None => (Bound::Unbounded, Bound::Unbounded),
        };

        // Walk order already satisfies the requested sort
        let ordered = query.sort == query.hint;

        let mut rows = Vec::new();
        for id in index.scan(lower, upper, reverse) {
            let doc = state.documents.get(id).ok_or_else(|| {
                StoreError::query_failed(format!("Index {} points at a missing record", index.spec()))
            })?;
            if !PredicateFilter::matches(doc, &query.filter) {
                continue;
            }
            rows.push(doc.clone());
            if ordered && rows.len() >= query.limit {
                break;
            }
        }

        if !ordered {
            ResultSorter::sort(&mut rows, &query.sort);
            rows.truncate(query.limit);
        }

        if let Some(projection) = &query.projection {
            rows = rows.iter().map(|doc| doc.project(projection)).collect();
        }

        Ok(rows)
    }
}
