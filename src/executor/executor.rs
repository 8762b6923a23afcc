//! Page executor for aeropage
//!
//! Issues exactly one bounded, hinted, sorted query per page against the
//! backing store.
//!
//! Execution flow (strict order):
//! 1. Widen the projection to cover every hint field
//! 2. Build the store query from the plan (limit = count + 1)
//! 3. Run it once; store errors pass through unchanged

use serde::Serialize;

use crate::planner::{Filter, KeyRange, PagePlan, Projection, SearchRequest, SortSpec};

use super::errors::StoreResult;
use super::result::Document;

/// One query against the backing store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreQuery {
    /// Filter predicate, passed through untouched
    pub filter: Filter,
    /// Order the returned rows must follow
    pub sort: SortSpec,
    /// Index to walk
    pub hint: SortSpec,
    /// Key range restriction
    pub range: Option<KeyRange>,
    /// Maximum rows to return
    pub limit: usize,
    /// Fields to return; `None` returns whole records
    pub projection: Option<Projection>,
}

/// Backing store boundary.
///
/// `find` must return at most `query.limit` rows ordered by `query.sort`,
/// restricted to `query.range`, matching `query.filter`.
pub trait PageStore {
    fn find(&self, query: &StoreQuery) -> StoreResult<Vec<Document>>;
}

impl<S: PageStore + ?Sized> PageStore for &S {
    fn find(&self, query: &StoreQuery) -> StoreResult<Vec<Document>> {
        (**self).find(query)
    }
}

impl<S: PageStore + ?Sized> PageStore for std::sync::Arc<S> {
    fn find(&self, query: &StoreQuery) -> StoreResult<Vec<Document>> {
        (**self).find(query)
    }
}

/// Page executor that runs plans against a store
pub struct PageExecutor<'a, S: PageStore> {
    store: &'a S,
}

impl<'a, S: PageStore> PageExecutor<'a, S> {
    /// Creates a new executor
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Builds the store query for a planned request
    pub fn query(request: &SearchRequest, plan: &PagePlan) -> StoreQuery {
        let traversal = &plan.traversal;
        let projection = request
            .projection
            .as_ref()
            .map(|p| p.including(traversal.hint.fields()));

        StoreQuery {
            filter: request.filter.clone(),
            sort: traversal.sorter.clone(),
            hint: traversal.hint.clone(),
            range: plan.range.clone(),
            limit: plan.fetch_limit,
            projection,
        }
    }

    /// Fetches up to `count + 1` rows in hint order.
    ///
    /// Deterministic: same plan + same data = same rows.
    pub fn fetch(&self, request: &SearchRequest, plan: &PagePlan) -> StoreResult<Vec<Document>> {
        let query = Self::query(request, plan);
        self.store.find(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::errors::StoreError;
    use crate::planner::{PagePlanner, SortOrder};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every query and answers with fixed rows
    struct RecordingStore {
        queries: Mutex<Vec<StoreQuery>>,
        rows: Vec<Document>,
        fail: bool,
    }

    impl RecordingStore {
        fn new(rows: Vec<Document>) -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                rows,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new())
            }
        }
    }

    impl PageStore for RecordingStore {
        fn find(&self, query: &StoreQuery) -> StoreResult<Vec<Document>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(StoreError::unavailable("offline"));
            }
            Ok(self.rows.iter().take(query.limit).cloned().collect())
        }
    }

    fn row(id: &str, age: i64) -> Document {
        Document::from_value(json!({"_id": id, "age": age, "name": id})).unwrap()
    }

    #[test]
    fn test_fetch_asks_for_one_extra_row() {
        let store = RecordingStore::new(vec![row("a", 1), row("b", 2), row("c", 3)]);
        let request = SearchRequest::new(SortSpec::asc("age"), 2);
        let plan = PagePlanner::default().plan(&request).unwrap();

        let rows = PageExecutor::new(&store).fetch(&request, &plan).unwrap();

        assert_eq!(rows.len(), 3);
        let queries = store.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].limit, 3);
        assert_eq!(queries[0].hint, plan.traversal.hint);
        assert_eq!(queries[0].sort, plan.traversal.sorter);
    }

    #[test]
    fn test_projection_widened_with_hint_fields() {
        let request = SearchRequest::new(SortSpec::desc("age"), 2)
            .with_projection(Projection::new(["name"]));
        let plan = PagePlanner::default().plan(&request).unwrap();

        let query = PageExecutor::<RecordingStore>::query(&request, &plan);

        let projection = query.projection.unwrap();
        assert_eq!(projection.fields(), &["name", "age", "_id"]);
    }

    #[test]
    fn test_reverse_query_carries_range() {
        let request = SearchRequest::new(SortSpec::asc("age"), 2)
            .with_cursor(row("b", 2).cursor_for(&SortSpec::asc("age").with_tiebreak("_id")))
            .with_direction(SortOrder::Desc);
        let plan = PagePlanner::default().plan(&request).unwrap();

        let query = PageExecutor::<RecordingStore>::query(&request, &plan);

        assert!(query.range.is_some());
        assert_eq!(query.hint.primary_order(), Some(SortOrder::Desc));
        assert!(query.projection.is_none());
    }

    #[test]
    fn test_store_error_passes_through() {
        let store = RecordingStore::failing();
        let request = SearchRequest::new(SortSpec::asc("age"), 2);
        let plan = PagePlanner::default().plan(&request).unwrap();

        let err = PageExecutor::new(&store).fetch(&request, &plan).unwrap_err();
        assert_eq!(err, StoreError::unavailable("offline"));
    }
}
