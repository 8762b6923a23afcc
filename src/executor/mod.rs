//! Page execution subsystem for aeropage
//!
//! Consumes page plans and produces pages with navigation links.
//!
//! # Execution Flow (strict order)
//!
//! 1. Plan the request (contract violations stop here)
//! 2. Fetch `count + 1` rows through the hinted index, in hint order
//! 3. Trim the overflow row and build scan links
//! 4. Map scan links to previous/next
//! 5. Reverse inverted walks into caller order
//!
//! # Invariants
//!
//! - Exactly one store query per page
//! - Store errors are returned unchanged, never retried
//! - Same request + same data = same records and links

mod assembler;
mod errors;
mod executor;
mod filters;
mod pager;
mod result;
mod sorter;

pub use assembler::PageAssembler;
pub use errors::{PageError, PageOutcome, Severity, StoreError, StoreErrorCode, StoreResult};
pub use executor::{PageExecutor, PageStore, StoreQuery};
pub use filters::PredicateFilter;
pub use pager::Paginator;
pub use result::{Document, PageLink, PageResult};
pub use sorter::ResultSorter;
