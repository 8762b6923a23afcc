//! Schema subsystem for aeropage
//!
//! Schemas are optional per collection. When present they cast every
//! written record before it reaches the store.
//!
//! # Design Principles
//!
//! - Cast, don't guess: each declared type has a fixed set of accepted inputs
//! - Closed records: undeclared fields are rejected
//! - Deterministic: the same input always casts to the same record
//!
//! # Invariants
//!
//! - A failed cast leaves the store untouched
//! - The identity field passes through without a declaration

mod caster;
mod errors;
mod loader;
mod types;

pub use caster::SchemaCaster;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::SchemaLoader;
pub use types::{FieldDef, FieldType, Schema};
