//! Page assembly
//!
//! Turns fetched rows into a caller-visible page:
//!
//! 1. Drop the overflow row; its presence yields the scan-forward link
//! 2. A supplied cursor yields the scan-backward link (cursor unchanged,
//!    direction flipped)
//! 3. Scan links map to left/right by walk direction
//! 4. Left/right map to previous/next by the primary order
//! 5. Inverted walks are reversed into caller order

use crate::planner::{Cursor, PagePlan, SearchRequest, SortOrder};

use super::result::{Document, PageLink, PageResult};

/// Assembles pages from fetched rows
pub struct PageAssembler;

impl PageAssembler {
    /// Assembles one page. `rows` are in hint order, at most `count + 1`.
    pub fn assemble(mut rows: Vec<Document>, plan: &PagePlan, request: &SearchRequest) -> PageResult {
        let traversal = &plan.traversal;

        let scan_forward = if plan.has_overflow(rows.len()) {
            // The boundary sits between the last kept row and the overflow
            // row. A cursor marks the boundary after its row in caller order,
            // which is the kept row on a natural walk and the overflow row on
            // a reverse walk.
            let boundary = if traversal.natural {
                &rows[plan.count - 1]
            } else {
                &rows[plan.count]
            };
            let cursor = boundary.cursor_for(&traversal.hint);
            rows.truncate(plan.count);
            Some(Self::link(request, plan, cursor, traversal.direction))
        } else {
            None
        };

        let scan_backward = request
            .cursor
            .clone()
            .map(|cursor| Self::link(request, plan, cursor, traversal.direction.flipped()));

        let (left, right) = if traversal.natural {
            (scan_backward, scan_forward)
        } else {
            (scan_forward, scan_backward)
        };

        let (previous, next) = match request.sort.primary_order() {
            Some(SortOrder::Desc) => (right, left),
            _ => (left, right),
        };

        if traversal.invert {
            rows.reverse();
        }

        if let Some(projection) = &request.projection {
            rows = rows.iter().map(|row| row.project(projection)).collect();
        }

        PageResult {
            records: rows,
            previous,
            next,
        }
    }

    /// Request for the adjacent page reached through `cursor`
    fn link(request: &SearchRequest, plan: &PagePlan, cursor: Cursor, direction: SortOrder) -> PageLink {
        SearchRequest {
            filter: request.filter.clone(),
            sort: request.sort.clone(),
            count: Some(plan.count as u64),
            cursor: Some(cursor),
            direction: Some(direction),
            projection: request.projection.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{PagePlanner, Projection, SortSpec};
    use serde_json::{json, Value};

    fn row(v: i64) -> Document {
        Document::from_value(json!({"_id": format!("r{}", v), "v": v, "extra": true})).unwrap()
    }

    fn values(page: &PageResult) -> Vec<i64> {
        page.records
            .iter()
            .map(|r| r.get("v").and_then(Value::as_i64).unwrap())
            .collect()
    }

    fn assemble(rows: Vec<Document>, request: &SearchRequest) -> PageResult {
        let plan = PagePlanner::default().plan(request).unwrap();
        PageAssembler::assemble(rows, &plan, request)
    }

    #[test]
    fn test_first_page_with_overflow() {
        let request = SearchRequest::new(SortSpec::asc("v"), 2);
        let page = assemble(vec![row(1), row(2), row(3)], &request);

        assert_eq!(values(&page), vec![1, 2]);
        assert!(page.previous.is_none());

        let next = page.next.unwrap();
        assert_eq!(next.direction, Some(SortOrder::Asc));
        assert_eq!(next.cursor.unwrap().value("v"), Some(&json!(2)));
    }

    #[test]
    fn test_exact_page_has_no_next() {
        let request = SearchRequest::new(SortSpec::asc("v"), 2);
        let page = assemble(vec![row(1), row(2)], &request);

        assert_eq!(values(&page), vec![1, 2]);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_backward_link_keeps_original_cursor() {
        let cursor = row(2).cursor_for(&SortSpec::asc("v").with_tiebreak("_id"));
        let request = SearchRequest::new(SortSpec::asc("v"), 2)
            .with_cursor(cursor.clone())
            .with_direction(SortOrder::Asc);
        let page = assemble(vec![row(3), row(4), row(5)], &request);

        let previous = page.previous.unwrap();
        assert_eq!(previous.cursor, Some(cursor));
        assert_eq!(previous.direction, Some(SortOrder::Desc));
        assert_eq!(
            page.next.unwrap().cursor.unwrap().value("v"),
            Some(&json!(4))
        );
    }

    #[test]
    fn test_reverse_walk_reorders_and_swaps_links() {
        let cursor = row(4).cursor_for(&SortSpec::asc("v").with_tiebreak("_id"));
        let request = SearchRequest::new(SortSpec::asc("v"), 2)
            .with_cursor(cursor.clone())
            .with_direction(SortOrder::Desc);
        // Hint order is descending: 4, 3 kept, 2 overflow
        let page = assemble(vec![row(4), row(3), row(2)], &request);

        assert_eq!(values(&page), vec![3, 4]);

        let next = page.next.unwrap();
        assert_eq!(next.cursor, Some(cursor));
        assert_eq!(next.direction, Some(SortOrder::Asc));

        let previous = page.previous.unwrap();
        assert_eq!(previous.direction, Some(SortOrder::Desc));
        assert_eq!(previous.cursor.unwrap().value("v"), Some(&json!(2)));
    }

    #[test]
    fn test_descending_primary_maps_continuation_to_previous() {
        let request = SearchRequest::new(SortSpec::desc("v"), 2);
        let page = assemble(vec![row(5), row(4), row(3)], &request);

        assert_eq!(values(&page), vec![5, 4]);
        assert!(page.next.is_none());
        let previous = page.previous.unwrap();
        assert_eq!(previous.direction, Some(SortOrder::Desc));
        assert_eq!(previous.cursor.unwrap().value("v"), Some(&json!(4)));
    }

    #[test]
    fn test_empty_rows_with_cursor() {
        let cursor = row(9).cursor_for(&SortSpec::asc("v").with_tiebreak("_id"));
        let request = SearchRequest::new(SortSpec::asc("v"), 2)
            .with_cursor(cursor)
            .with_direction(SortOrder::Asc);
        let page = assemble(Vec::new(), &request);

        assert!(page.is_empty());
        assert!(page.next.is_none());
        assert!(page.previous.is_some());
    }

    #[test]
    fn test_records_narrowed_to_projection() {
        let request =
            SearchRequest::new(SortSpec::asc("v"), 1).with_projection(Projection::new(["extra"]));
        let page = assemble(vec![row(1), row(2)], &request);

        let record = &page.records[0];
        assert!(record.contains("extra"));
        assert!(!record.contains("v"));
        // Cursor still built from the hint fields
        assert_eq!(
            page.next.unwrap().cursor.unwrap().value("v"),
            Some(&json!(1))
        );
    }
}
