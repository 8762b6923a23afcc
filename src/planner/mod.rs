//! Page planning subsystem for aeropage
//!
//! Turns a page request into a deterministic, bounded walk over an index.
//!
//! # Design Principles
//!
//! - Deterministic: same request, same plan
//! - Bounded: every fetch is limited to one row past the page size
//! - Keyset: resumption seeks to a cursor through the index, never skips rows
//! - Explicit: contract violations are rejected before the store is touched
//!
//! # Resolution
//!
//! 1. The caller sort gains the identity tie-break
//! 2. Direction decides whether the walk is natural or inverted
//! 3. The cursor becomes an exclusive lower or inclusive upper bound

mod ast;
mod bounds;
mod cursor;
mod errors;
mod explain;
mod planner;
mod resolver;

pub use ast::{
    Filter, FilterOp, Predicate, Projection, SearchRequest, SortKey, SortOrder, SortSpec,
};
pub use bounds::{KeyBound, KeyRange, RangeBoundBuilder};
pub use cursor::Cursor;
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult, Severity};
pub use explain::ExplainPlan;
pub use planner::{PagePlan, PagePlanner, DEFAULT_COUNT};
pub use resolver::{DirectionResolver, TraversalPlan};
