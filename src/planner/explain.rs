//! Explain output for page requests
//!
//! Describes how a request would be walked without touching the store.

use std::fmt;

use serde::Serialize;

use super::ast::{FilterOp, SearchRequest};
use super::bounds::{KeyBound, KeyRange};
use super::errors::PlannerError;
use super::planner::PagePlan;

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Whether planning succeeded
    pub accepted: bool,
    /// Index hint (if accepted)
    pub hint: Option<String>,
    /// Result ordering (if accepted)
    pub sorter: Option<String>,
    /// Walk follows caller order
    pub natural: Option<bool>,
    /// Rows reversed before returning
    pub invert: Option<bool>,
    /// Filter predicates, one line each
    pub predicates: Vec<String>,
    /// Range restriction
    pub range: Option<KeyRange>,
    /// Rows requested from the store
    pub fetch_limit: Option<usize>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from an accepted page plan
    pub fn from_plan(request: &SearchRequest, plan: &PagePlan) -> Self {
        let predicates = request
            .filter
            .predicates()
            .iter()
            .map(|p| {
                let operand = match &p.op {
                    FilterOp::Eq(v)
                    | FilterOp::Ne(v)
                    | FilterOp::Gt(v)
                    | FilterOp::Gte(v)
                    | FilterOp::Lt(v)
                    | FilterOp::Lte(v) => v.to_string(),
                    FilterOp::In(values) => serde_json::Value::from(values.clone()).to_string(),
                };
                format!("{} {} {}", p.field, p.op.op_name(), operand)
            })
            .collect();

        Self {
            accepted: true,
            hint: Some(plan.traversal.hint.to_string()),
            sorter: Some(plan.traversal.sorter.to_string()),
            natural: Some(plan.traversal.natural),
            invert: Some(plan.traversal.invert),
            predicates,
            range: plan.range.clone(),
            fetch_limit: Some(plan.fetch_limit),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(err: &PlannerError) -> Self {
        Self {
            accepted: false,
            hint: None,
            sorter: None,
            natural: None,
            invert: None,
            predicates: Vec::new(),
            range: None,
            fetch_limit: None,
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }
}

fn describe_bound(bound: &KeyBound) -> String {
    match bound {
        KeyBound::Unbounded => "unbounded".to_string(),
        KeyBound::Inclusive(c) => format!("inclusive {}", c.encode()),
        KeyBound::Exclusive(c) => format!("exclusive {}", c.encode()),
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PAGE ===")?;

        if !self.accepted {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
            return Ok(());
        }

        writeln!(f, "Status: ACCEPTED")?;
        if let Some(hint) = &self.hint {
            writeln!(f, "Hint: {}", hint)?;
        }
        if let Some(sorter) = &self.sorter {
            writeln!(f, "Sort: {}", sorter)?;
        }
        if let (Some(natural), Some(invert)) = (self.natural, self.invert) {
            writeln!(f, "Natural: {} Invert: {}", natural, invert)?;
        }
        if !self.predicates.is_empty() {
            writeln!(f, "Predicates:")?;
            for pred in &self.predicates {
                writeln!(f, "  - {}", pred)?;
            }
        }
        match &self.range {
            Some(range) => {
                writeln!(f, "Lower: {}", describe_bound(&range.lower))?;
                writeln!(f, "Upper: {}", describe_bound(&range.upper))?;
            }
            None => writeln!(f, "Range: full")?,
        }
        if let Some(limit) = self.fetch_limit {
            writeln!(f, "Fetch Limit: {}", limit)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ast::{Filter, Predicate, SortSpec};
    use crate::planner::planner::PagePlanner;
    use serde_json::json;

    #[test]
    fn test_accepted_explain() {
        let request = SearchRequest::new(SortSpec::asc("age"), 2)
            .with_filter(Filter::all().and(Predicate::gte("age", json!(18))));
        let plan = PagePlanner::default().plan(&request).unwrap();

        let explain = ExplainPlan::from_plan(&request, &plan);
        let text = explain.to_string();

        assert!(explain.accepted);
        assert_eq!(explain.fetch_limit, Some(3));
        assert!(text.contains("Hint: [age:1,_id:1]"));
        assert!(text.contains("age gte 18"));
        assert!(text.contains("Range: full"));
    }

    #[test]
    fn test_rejected_explain() {
        let request = SearchRequest::new(SortSpec::asc("age"), 0);
        let err = PagePlanner::default().plan(&request).unwrap_err();

        let explain = ExplainPlan::from_error(&err);
        assert!(!explain.accepted);
        assert_eq!(
            explain.rejection_code.as_deref(),
            Some("AERO_PAGE_COUNT_INVALID")
        );
        assert!(explain.to_string().contains("REJECTED"));
    }
}
