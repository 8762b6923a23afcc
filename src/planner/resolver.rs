//! Sort & direction resolution
//!
//! Decides which way the store is walked and which index hint and result
//! ordering drive the walk.
//!
//! - natural: requested direction equals the primary order; the store is
//!   walked in caller order
//! - otherwise the hint and sorter are the caller order inverted key by key
//!   (tie-break included) and the fetched rows are reversed afterwards

use serde::Serialize;

use super::ast::{SortOrder, SortSpec};

/// Outcome of direction resolution. Immutable, no runtime state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalPlan {
    /// Direction the store is walked in
    pub direction: SortOrder,
    /// True when walking in caller order
    pub natural: bool,
    /// True when fetched rows must be reversed before returning
    pub invert: bool,
    /// Caller sort plus the identity tie-break
    pub key_order: SortSpec,
    /// Index hint passed to the store
    pub hint: SortSpec,
    /// Result ordering passed to the store
    pub sorter: SortSpec,
}

/// Resolves traversal direction for a sort specification
#[derive(Debug, Clone)]
pub struct DirectionResolver {
    id_field: String,
}

impl DirectionResolver {
    /// Creates a resolver that tie-breaks on `id_field`
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }

    /// Identity tie-break field
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Resolves the traversal for `sort` walked towards `direction`.
    ///
    /// A missing direction defaults to the primary order. Pure: the caller's
    /// spec is never modified and the returned specs share nothing with it.
    pub fn resolve(&self, sort: &SortSpec, direction: Option<SortOrder>) -> TraversalPlan {
        let primary = sort.primary_order().unwrap_or(SortOrder::Asc);
        let direction = direction.unwrap_or(primary);
        let natural = direction == primary;

        let key_order = sort.with_tiebreak(&self.id_field);
        let hint = if natural {
            key_order.clone()
        } else {
            key_order.inverted()
        };

        TraversalPlan {
            direction,
            natural,
            invert: !natural,
            sorter: hint.clone(),
            hint,
            key_order,
        }
    }
}

impl Default for DirectionResolver {
    fn default() -> Self {
        Self::new("_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ast::SortKey;

    #[test]
    fn test_default_direction_is_natural() {
        let resolver = DirectionResolver::default();
        let sort = SortSpec::asc("age");

        let plan = resolver.resolve(&sort, None);

        assert!(plan.natural);
        assert!(!plan.invert);
        assert_eq!(plan.direction, SortOrder::Asc);
        assert_eq!(plan.hint, SortSpec::asc("age").then(SortKey::asc("_id")));
        assert_eq!(plan.sorter, plan.hint);
    }

    #[test]
    fn test_opposite_direction_inverts_hint_and_tiebreak() {
        let resolver = DirectionResolver::default();
        let sort = SortSpec::asc("age");

        let plan = resolver.resolve(&sort, Some(SortOrder::Desc));

        assert!(!plan.natural);
        assert!(plan.invert);
        assert_eq!(plan.hint, SortSpec::desc("age").then(SortKey::desc("_id")));
        assert_eq!(plan.key_order, SortSpec::asc("age").then(SortKey::asc("_id")));
        // Caller spec untouched
        assert_eq!(sort, SortSpec::asc("age"));
    }

    #[test]
    fn test_descending_primary() {
        let resolver = DirectionResolver::new("id");
        let sort = SortSpec::desc("score");

        let natural = resolver.resolve(&sort, Some(SortOrder::Desc));
        assert!(natural.natural);
        assert_eq!(natural.hint, SortSpec::desc("score").then(SortKey::desc("id")));

        let reverse = resolver.resolve(&sort, Some(SortOrder::Asc));
        assert!(!reverse.natural);
        assert_eq!(reverse.hint, SortSpec::asc("score").then(SortKey::asc("id")));
    }

    #[test]
    fn test_secondary_keys_keep_precedence() {
        let resolver = DirectionResolver::default();
        let sort = SortSpec::asc("last").then(SortKey::desc("first"));

        let plan = resolver.resolve(&sort, Some(SortOrder::Desc));
        let fields: Vec<&str> = plan.hint.fields().collect();

        assert_eq!(fields, vec!["last", "first", "_id"]);
        assert_eq!(plan.hint.keys()[1].order, SortOrder::Asc);
    }
}
