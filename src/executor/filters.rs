//! Predicate filtering for page execution
//!
//! Filters documents strictly according to predicates.
//! No type coercion: range operators compare numbers with numbers and
//! strings with strings only.

use std::cmp::Ordering;

use serde_json::Value;

use super::result::Document;
use crate::planner::{Filter, FilterOp, Predicate};

/// Evaluates predicates against documents
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a document matches every predicate of the filter
    pub fn matches(document: &Document, filter: &Filter) -> bool {
        filter
            .predicates()
            .iter()
            .all(|pred| Self::matches_predicate(document, pred))
    }

    /// Checks if a document matches a single predicate
    fn matches_predicate(document: &Document, predicate: &Predicate) -> bool {
        let field_value = match document.get_path(&predicate.field) {
            Some(v) => v,
            None => return false, // Missing field = no match
        };

        // Null values never match
        if field_value.is_null() {
            return false;
        }

        match &predicate.op {
            FilterOp::Eq(expected) => field_value == expected,
            FilterOp::Ne(expected) => field_value != expected,
            FilterOp::In(candidates) => candidates.iter().any(|c| c == field_value),
            FilterOp::Gt(bound) => Self::compare(field_value, bound) == Some(Ordering::Greater),
            FilterOp::Gte(bound) => matches!(
                Self::compare(field_value, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lt(bound) => Self::compare(field_value, bound) == Some(Ordering::Less),
            FilterOp::Lte(bound) => matches!(
                Self::compare(field_value, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }

    /// Orders same-typed scalars; `None` for anything else
    fn compare(actual: &Value, bound: &Value) -> Option<Ordering> {
        match (actual, bound) {
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                    return Some(ai.cmp(&bi));
                }
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    fn one(pred: Predicate) -> Filter {
        Filter::all().and(pred)
    }

    #[test]
    fn test_equality_match() {
        let d = doc(json!({"name": "Alice", "age": 30}));

        assert!(PredicateFilter::matches(&d, &one(Predicate::eq("name", json!("Alice")))));
        assert!(!PredicateFilter::matches(&d, &one(Predicate::eq("name", json!("Bob")))));
        assert!(PredicateFilter::matches(&d, &one(Predicate::ne("name", json!("Bob")))));
    }

    #[test]
    fn test_no_type_coercion() {
        let d = doc(json!({"value": 123}));

        assert!(!PredicateFilter::matches(&d, &one(Predicate::eq("value", json!("123")))));
        assert!(PredicateFilter::matches(&d, &one(Predicate::eq("value", json!(123)))));
        assert!(!PredicateFilter::matches(&d, &one(Predicate::gt("value", json!("100")))));
    }

    #[test]
    fn test_range_predicates() {
        let d = doc(json!({"age": 25, "score": 2.5}));

        assert!(PredicateFilter::matches(&d, &one(Predicate::gte("age", json!(18)))));
        assert!(PredicateFilter::matches(&d, &one(Predicate::lte("age", json!(30)))));
        assert!(!PredicateFilter::matches(&d, &one(Predicate::gt("age", json!(25)))));
        assert!(!PredicateFilter::matches(&d, &one(Predicate::lt("age", json!(25)))));
        assert!(PredicateFilter::matches(&d, &one(Predicate::lt("score", json!(3)))));
    }

    #[test]
    fn test_membership() {
        let d = doc(json!({"status": "open"}));

        let pred = Predicate::is_in("status", vec![json!("open"), json!("held")]);
        assert!(PredicateFilter::matches(&d, &one(pred)));

        let pred = Predicate::is_in("status", vec![json!("closed")]);
        assert!(!PredicateFilter::matches(&d, &one(pred)));
    }

    #[test]
    fn test_multiple_predicates_and() {
        let d = doc(json!({"age": 25, "active": true}));

        let filter = Filter::all()
            .and(Predicate::gte("age", json!(18)))
            .and(Predicate::eq("active", json!(true)));
        assert!(PredicateFilter::matches(&d, &filter));

        let filter = Filter::all()
            .and(Predicate::gte("age", json!(18)))
            .and(Predicate::eq("active", json!(false)));
        assert!(!PredicateFilter::matches(&d, &filter));
    }

    #[test]
    fn test_nested_path() {
        let d = doc(json!({"address": {"city": "Oslo"}}));
        assert!(PredicateFilter::matches(
            &d,
            &one(Predicate::eq("address.city", json!("Oslo")))
        ));
    }

    #[test]
    fn test_missing_and_null_never_match() {
        let d = doc(json!({"name": null}));

        assert!(!PredicateFilter::matches(&d, &one(Predicate::eq("age", json!(30)))));
        assert!(!PredicateFilter::matches(&d, &one(Predicate::ne("name", json!("Alice")))));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(PredicateFilter::matches(&doc(json!({})), &Filter::all()));
    }
}
