//! aeropage - Bidirectional keyset pagination over indexed document collections
//!
//! A request names a filter, a sort, a page size and an optional cursor.
//! The paginator walks the store's index from the cursor in either
//! direction and returns one page plus links to its neighbours.
//!
//! ```ignore
//! use aeropage::executor::Paginator;
//! use aeropage::index::MemoryCollection;
//! use aeropage::planner::{SearchRequest, SortSpec};
//!
//! let collection = MemoryCollection::new("users", "_id");
//! collection.ensure_index(&SortSpec::asc("age"))?;
//! let page = Paginator::new(&collection).page(&SearchRequest::new(SortSpec::asc("age"), 20))?;
//! if let Some(next) = page.next {
//!     let following = Paginator::new(&collection).page(&next)?;
//! }
//! ```

pub mod cli;
pub mod config;
pub mod executor;
pub mod index;
pub mod observability;
pub mod planner;
pub mod realtime;
pub mod schema;
pub mod service;
pub mod visibility;

pub use config::PagerConfig;
pub use executor::{Document, PageError, PageResult, Paginator};
pub use planner::{Cursor, SearchRequest, SortKey, SortOrder, SortSpec};
pub use service::{CollectionService, ServiceError};
pub use visibility::{Role, VisibilityPolicy};
