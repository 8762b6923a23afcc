//! Page planner
//!
//! Validates a page request and produces the immutable plan the executor
//! runs. Contract violations are raised here, before any store call:
//!
//! 1. Sort must name at least one field
//! 2. Count (or the default, when absent) must be >= 1 and <= the
//!    configured maximum
//! 3. A cursor requires an explicit direction
//!
//! Then direction is resolved and the cursor becomes a key range.

use super::ast::SearchRequest;
use super::bounds::{KeyRange, RangeBoundBuilder};
use super::errors::{PlannerError, PlannerResult};
use super::resolver::{DirectionResolver, TraversalPlan};

/// Immutable page plan (no runtime state)
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// Resolved traversal
    pub traversal: TraversalPlan,
    /// Store range restriction, if resuming from a cursor
    pub range: Option<KeyRange>,
    /// Requested page size
    pub count: usize,
    /// Rows fetched from the store: one more than the page size
    pub fetch_limit: usize,
}

impl PagePlan {
    /// True when the store fetch may return an overflow row
    pub fn has_overflow(&self, fetched: usize) -> bool {
        fetched > self.count
    }
}

/// Plans page requests
#[derive(Debug, Clone)]
pub struct PagePlanner {
    resolver: DirectionResolver,
    default_count: u64,
    max_count: u64,
}

/// Page size applied when a request gives none
pub const DEFAULT_COUNT: u64 = 20;

impl PagePlanner {
    /// Creates a planner tie-breaking on `id_field` and accepting page sizes
    /// up to `max_count`
    pub fn new(id_field: impl Into<String>, max_count: u64) -> Self {
        Self {
            resolver: DirectionResolver::new(id_field),
            default_count: DEFAULT_COUNT,
            max_count,
        }
    }

    /// Page size used for requests that give none
    pub fn with_default_count(mut self, default_count: u64) -> Self {
        self.default_count = default_count;
        self
    }

    /// Identity tie-break field
    pub fn id_field(&self) -> &str {
        self.resolver.id_field()
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn default_count(&self) -> u64 {
        self.default_count
    }

    /// Page size a request resolves to
    pub fn count_for(&self, request: &SearchRequest) -> u64 {
        request.count.unwrap_or(self.default_count)
    }

    /// Plans a request, returning an immutable plan or a contract violation.
    ///
    /// Deterministic: same request, same plan.
    pub fn plan(&self, request: &SearchRequest) -> PlannerResult<PagePlan> {
        self.validate(request)?;

        let traversal = self.resolver.resolve(&request.sort, request.direction);
        let range = RangeBoundBuilder::build(request.cursor.as_ref(), &traversal);
        let count = self.count_for(request) as usize;

        Ok(PagePlan {
            traversal,
            range,
            count,
            fetch_limit: count + 1,
        })
    }

    fn validate(&self, request: &SearchRequest) -> PlannerResult<()> {
        if request.sort.is_empty() {
            return Err(PlannerError::sort_empty());
        }

        let count = self.count_for(request);
        if count < 1 {
            return Err(PlannerError::count_invalid(count));
        }

        if count > self.max_count {
            return Err(PlannerError::count_too_large(count, self.max_count));
        }

        if request.cursor.is_some() && request.direction.is_none() {
            return Err(PlannerError::direction_required());
        }

        Ok(())
    }
}

impl Default for PagePlanner {
    fn default() -> Self {
        Self::new("_id", 1000)
    }
}
