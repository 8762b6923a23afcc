//! Collection service for aeropage
//!
//! The CRUD layer around the paginator: schema casting on write, change
//! events after every commit, field visibility on read.
//!
//! # Invariants
//!
//! - A rejected write leaves the collection and the change stream untouched
//! - One committed write publishes exactly one change event
//! - Visibility never alters page links

mod collection;
mod errors;

pub use collection::CollectionService;
pub use errors::{ServiceError, ServiceResult};
