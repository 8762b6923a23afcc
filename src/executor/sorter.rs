//! Result sorting for page execution
//!
//! Orders records by a multi-key sort specification, deterministically.
//! Value ordering matches the index: null < bool < number < string < array
//! < object, with missing fields read as null.

use std::cmp::Ordering;

use serde_json::Value;

use super::result::Document;
use crate::index::IndexKey;
use crate::planner::SortSpec;

/// Sorts result documents
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts documents according to a sort specification.
    ///
    /// Sort is stable and deterministic.
    pub fn sort(documents: &mut [Document], spec: &SortSpec) {
        documents.sort_by(|a, b| Self::compare_documents(a, b, spec));
    }

    /// Compares two documents key by key
    pub fn compare_documents(a: &Document, b: &Document, spec: &SortSpec) -> Ordering {
        for key in spec.keys() {
            let ordering = Self::compare_values(a.value_or_null(&key.field), b.value_or_null(&key.field));
            let ordering = key.order.apply(ordering);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Compares two JSON values for sorting.
    pub fn compare_values(a: &Value, b: &Value) -> Ordering {
        IndexKey::from_json(a).cmp(&IndexKey::from_json(b))
    }
}
