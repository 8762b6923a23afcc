//! Range bounds derived from a resumption cursor
//!
//! A cursor marks the boundary immediately after its row in caller order
//! (caller sort plus tie-break). Turning it into a key range lets the store
//! seek straight to the boundary through its index instead of skipping rows:
//!
//! - natural walk: rows strictly after the cursor row (exclusive lower bound)
//! - reverse walk: rows up to and including the cursor row (inclusive upper
//!   bound)

use serde::Serialize;

use super::ast::SortSpec;
use super::cursor::Cursor;
use super::resolver::TraversalPlan;

/// One end of a key range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "cursor", rename_all = "snake_case")]
pub enum KeyBound {
    Unbounded,
    Inclusive(Cursor),
    Exclusive(Cursor),
}

impl KeyBound {
    /// The cursor carried by this bound
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            KeyBound::Unbounded => None,
            KeyBound::Inclusive(c) | KeyBound::Exclusive(c) => Some(c),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, KeyBound::Unbounded)
    }
}

/// Key range over compound keys, expressed in `order`.
///
/// `lower` and `upper` are relative to `order`, not to the hint the store is
/// walked with: a reverse walk uses the same range with the opposite hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyRange {
    /// Ordering the bounds are expressed in
    pub order: SortSpec,
    /// Lower bound in `order`
    pub lower: KeyBound,
    /// Upper bound in `order`
    pub upper: KeyBound,
}

impl KeyRange {
    /// Rows strictly after `cursor`
    pub fn after(order: SortSpec, cursor: Cursor) -> Self {
        Self {
            order,
            lower: KeyBound::Exclusive(cursor),
            upper: KeyBound::Unbounded,
        }
    }

    /// Rows up to and including `cursor`
    pub fn at_or_before(order: SortSpec, cursor: Cursor) -> Self {
        Self {
            order,
            lower: KeyBound::Unbounded,
            upper: KeyBound::Inclusive(cursor),
        }
    }

    /// Cursors carried by either bound
    pub fn cursors(&self) -> impl Iterator<Item = &Cursor> {
        self.lower.cursor().into_iter().chain(self.upper.cursor())
    }
}

/// Builds the store range restriction for one page fetch.
pub struct RangeBoundBuilder;

impl RangeBoundBuilder {
    /// Returns no range when there is no cursor.
    ///
    /// The cursor is not checked against the hint fields; a mismatched cursor
    /// reaches the store, which reports its own error.
    pub fn build(cursor: Option<&Cursor>, plan: &TraversalPlan) -> Option<KeyRange> {
        let cursor = cursor?.clone();
        let order = plan.key_order.clone();

        if plan.natural {
            Some(KeyRange::after(order, cursor))
        } else {
            Some(KeyRange::at_or_before(order, cursor))
        }
    }
}
