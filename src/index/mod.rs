//! In-memory indexed store for aeropage
//!
//! The reference backing store for the paginator.
//!
//! # Design Principles
//!
//! - Compound indexes: BTreeMap keyed by every sort field plus identity
//! - Total order: the identity tie-break makes every index key unique
//! - Bidirectional: one index serves its spec and the inverted spec
//!
//! # Invariants
//!
//! - Every write updates every index before the lock is released
//! - Missing fields index as null
//! - A hint with no serving index is an error, never a full scan

mod btree;
mod collection;
mod errors;

pub use btree::{CompoundKey, IndexKey, IndexTree};
pub use collection::MemoryCollection;
pub use errors::{IndexError, IndexErrorCode, IndexResult, Severity};
