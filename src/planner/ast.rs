//! Page request structures
//!
//! Defines the parsed request representation consumed by the resolver.
//! Sort specifications are explicit ordered lists: the position of a key
//! decides its tie-break precedence.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cursor::Cursor;

/// Sort order of a single key, serialized as `1` / `-1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SortOrder {
    /// Ascending (+1)
    Asc,
    /// Descending (-1)
    Desc,
}

impl SortOrder {
    /// Returns the signed representation
    pub fn sign(&self) -> i64 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }

    /// Returns the opposite order
    pub fn flipped(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Applies this order to an ascending comparison
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl TryFrom<i64> for SortOrder {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortOrder::Asc),
            -1 => Ok(SortOrder::Desc),
            other => Err(format!("sort order must be 1 or -1, got {}", other)),
        }
    }
}

impl From<SortOrder> for i64 {
    fn from(order: SortOrder) -> Self {
        order.sign()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// One (field, order) entry of a sort specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// Field path (dotted paths address nested objects)
    pub field: String,
    /// Sort order
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}

/// Ordered sort specification. The first key is the primary field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Creates a spec from ordered keys
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Single ascending key
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(vec![SortKey::asc(field)])
    }

    /// Single descending key
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(vec![SortKey::desc(field)])
    }

    /// Appends a key, keeping precedence order
    pub fn then(mut self, key: SortKey) -> Self {
        self.keys.push(key);
        self
    }

    /// The primary (first) key
    pub fn primary(&self) -> Option<&SortKey> {
        self.keys.first()
    }

    /// The primary key's order
    pub fn primary_order(&self) -> Option<SortOrder> {
        self.primary().map(|k| k.order)
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Field names in precedence order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.field.as_str())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.keys.iter().any(|k| k.field == field)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns a new spec with every order negated.
    ///
    /// The receiver is left untouched.
    pub fn inverted(&self) -> Self {
        Self {
            keys: self
                .keys
                .iter()
                .map(|k| SortKey::new(k.field.clone(), k.order.flipped()))
                .collect(),
        }
    }

    /// Returns a new spec ending with the identity tie-break field.
    ///
    /// The tie-break follows the primary order. Specs that already name the
    /// identity field are returned unchanged.
    pub fn with_tiebreak(&self, id_field: &str) -> Self {
        let mut spec = self.clone();
        if !spec.contains_field(id_field) {
            let order = self.primary_order().unwrap_or(SortOrder::Asc);
            spec.keys.push(SortKey::new(id_field, order));
        }
        spec
    }

    /// True when both specs name the same fields in the same order
    pub fn same_fields(&self, other: &SortSpec) -> bool {
        self.keys.len() == other.keys.len()
            && self
                .keys
                .iter()
                .zip(other.keys.iter())
                .all(|(a, b)| a.field == b.field)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .keys
            .iter()
            .map(|k| format!("{}:{}", k.field, k.order))
            .collect();
        write!(f, "[{}]", parts.join(","))
    }
}

/// Filter operation types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    /// Equality: field = value
    Eq(Value),
    /// Inequality: field != value
    Ne(Value),
    /// Greater than: field > value
    Gt(Value),
    /// Greater than or equal: field >= value
    Gte(Value),
    /// Less than: field < value
    Lt(Value),
    /// Less than or equal: field <= value
    Lte(Value),
    /// Membership: field in [values]
    In(Vec<Value>),
}

impl FilterOp {
    /// Returns the operation name for explain output
    pub fn op_name(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "eq",
            FilterOp::Ne(_) => "ne",
            FilterOp::Gt(_) => "gt",
            FilterOp::Gte(_) => "gte",
            FilterOp::Lt(_) => "lt",
            FilterOp::Lte(_) => "lte",
            FilterOp::In(_) => "in",
        }
    }
}

/// A single predicate (field + operation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Field path
    pub field: String,
    /// Filter operation
    pub op: FilterOp,
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value),
        }
    }

    pub fn ne(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Ne(value),
        }
    }

    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gt(value),
        }
    }

    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gte(value),
        }
    }

    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lt(value),
        }
    }

    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lte(value),
        }
    }

    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::In(values),
        }
    }
}

/// Opaque filter predicate: a conjunction of predicates.
///
/// The pagination core never inspects it; it is handed to the store as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Matches every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Field projection: the fields a caller wants back
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns a projection that also covers `extra`, keeping order and
    /// skipping duplicates
    pub fn including<'a>(&self, extra: impl IntoIterator<Item = &'a str>) -> Self {
        let mut fields = self.fields.clone();
        for field in extra {
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        Self { fields }
    }
}

/// One page request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Filter predicate (opaque to the core)
    #[serde(default)]
    pub filter: Filter,
    /// Caller sort specification
    pub sort: SortSpec,
    /// Page size (must be >= 1); the planner's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Resumption cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
    /// Traversal direction; defaults to the primary order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortOrder>,
    /// Requested fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl SearchRequest {
    /// Creates a first-page request
    pub fn new(sort: SortSpec, count: u64) -> Self {
        Self {
            filter: Filter::all(),
            sort,
            count: Some(count),
            cursor: None,
            direction: None,
            projection: None,
        }
    }

    /// Drops the page size so the planner's default applies
    pub fn with_default_count(mut self) -> Self {
        self.count = None;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn with_direction(mut self, direction: SortOrder) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Effective direction: explicit or the primary order
    pub fn effective_direction(&self) -> Option<SortOrder> {
        self.direction.or_else(|| self.sort.primary_order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_order_signs() {
        assert_eq!(SortOrder::Asc.sign(), 1);
        assert_eq!(SortOrder::Desc.sign(), -1);
        assert_eq!(SortOrder::Asc.flipped(), SortOrder::Desc);
        assert_eq!(SortOrder::try_from(-1).unwrap(), SortOrder::Desc);
        assert!(SortOrder::try_from(0).is_err());
    }

    #[test]
    fn test_primary_is_first_key() {
        let spec = SortSpec::desc("created_at").then(SortKey::asc("name"));
        assert_eq!(spec.primary().unwrap().field, "created_at");
        assert_eq!(spec.primary_order(), Some(SortOrder::Desc));
        let fields: Vec<&str> = spec.fields().collect();
        assert_eq!(fields, vec!["created_at", "name"]);
    }

    #[test]
    fn test_inverted_does_not_alias() {
        let spec = SortSpec::asc("age").then(SortKey::desc("name"));
        let inverted = spec.inverted();

        assert_eq!(spec.keys()[0].order, SortOrder::Asc);
        assert_eq!(inverted.keys()[0].order, SortOrder::Desc);
        assert_eq!(inverted.keys()[1].order, SortOrder::Asc);
        assert_eq!(inverted.inverted(), spec);
    }

    #[test]
    fn test_tiebreak_follows_primary_order() {
        let spec = SortSpec::desc("score").with_tiebreak("_id");
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.keys()[1], SortKey::desc("_id"));

        // Already present: unchanged
        let explicit = SortSpec::asc("_id");
        assert_eq!(explicit.with_tiebreak("_id"), explicit);
    }

    #[test]
    fn test_request_json_shape() {
        let request: SearchRequest = serde_json::from_value(json!({
            "filter": [{"field": "status", "op": {"eq": "open"}}],
            "sort": [{"field": "age", "order": -1}],
            "count": 10
        }))
        .unwrap();

        assert_eq!(request.sort.primary_order(), Some(SortOrder::Desc));
        assert_eq!(request.filter.predicates().len(), 1);
        assert_eq!(request.effective_direction(), Some(SortOrder::Desc));
        assert!(request.cursor.is_none());
        assert_eq!(request.count, Some(10));
    }

    #[test]
    fn test_request_count_is_optional() {
        let request: SearchRequest = serde_json::from_value(json!({
            "sort": [{"field": "v", "order": 1}]
        }))
        .unwrap();
        assert_eq!(request.count, None);

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("count").is_none());
    }

    #[test]
    fn test_projection_including_skips_duplicates() {
        let projection = Projection::new(["name", "age"]);
        let widened = projection.including(["age", "_id"]);
        assert_eq!(widened.fields(), &["name", "age", "_id"]);
    }
}
