//! Schema-driven field casting
//!
//! Coerces loosely typed input into the declared field types:
//!
//! - int accepts integral numbers and numeric strings
//! - float accepts numbers and numeric strings
//! - bool accepts `true`/`false`/`1`/`0` as strings or numbers
//! - string accepts numbers and booleans, rendered as text
//! - datetime accepts RFC 3339 strings or unix seconds, stored as RFC 3339 UTC
//!
//! Rejected: undeclared fields, missing required fields, uncastable values.
//! Null on an optional field removes it. The identity field is always
//! permitted at the top level.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Number, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDef, FieldType, Schema};
use crate::executor::Document;

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn child_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Casts records to a schema
#[derive(Debug, Clone)]
pub struct SchemaCaster {
    id_field: String,
}

impl SchemaCaster {
    /// Creates a caster that always lets `id_field` through
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }

    /// Casts a record. Does not mutate the input on failure.
    pub fn cast(&self, schema: &Schema, value: Value) -> SchemaResult<Document> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(SchemaError::cast_failed(
                    "$root",
                    "object",
                    json_type_name(&other),
                ))
            }
        };

        let mut id = None;
        let mut rest = Map::new();
        for (name, value) in fields {
            if name == self.id_field {
                id = Some(value);
            } else {
                rest.insert(name, value);
            }
        }

        let mut cast = Self::cast_object(&schema.fields, rest, "")?;
        if let Some(id) = id {
            cast.insert(self.id_field.clone(), id);
        }
        Ok(Document::from(cast))
    }

    fn cast_object(
        defs: &std::collections::BTreeMap<String, FieldDef>,
        mut fields: Map<String, Value>,
        prefix: &str,
    ) -> SchemaResult<Map<String, Value>> {
        if let Some(unknown) = fields.keys().find(|k| !defs.contains_key(*k)) {
            return Err(SchemaError::unknown_field(child_path(prefix, unknown)));
        }

        let mut out = Map::new();
        for (name, def) in defs {
            let path = child_path(prefix, name);
            match fields.remove(name) {
                None | Some(Value::Null) => {
                    if def.required {
                        return Err(SchemaError::missing_field(path));
                    }
                }
                Some(value) => {
                    out.insert(name.clone(), Self::cast_value(&def.field_type, value, &path)?);
                }
            }
        }
        Ok(out)
    }

    fn cast_value(field_type: &FieldType, value: Value, path: &str) -> SchemaResult<Value> {
        let fail = |value: &Value| {
            SchemaError::cast_failed(path, field_type.type_name(), json_type_name(value))
        };

        match field_type {
            FieldType::String => match value {
                Value::String(_) => Ok(value),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                other => Err(fail(&other)),
            },
            FieldType::Int => {
                let cast = match &value {
                    Value::Number(n) => n.as_i64().or_else(|| {
                        n.as_f64()
                            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                            .map(|f| f as i64)
                    }),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                cast.map(Value::from).ok_or_else(|| fail(&value))
            }
            FieldType::Float => {
                let cast = match &value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                cast.and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| fail(&value))
            }
            FieldType::Bool => {
                let cast = match &value {
                    Value::Bool(b) => Some(*b),
                    Value::Number(n) => match n.as_i64() {
                        Some(0) => Some(false),
                        Some(1) => Some(true),
                        _ => None,
                    },
                    Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                        "true" | "1" => Some(true),
                        "false" | "0" => Some(false),
                        _ => None,
                    },
                    _ => None,
                };
                cast.map(Value::Bool).ok_or_else(|| fail(&value))
            }
            FieldType::Datetime => {
                let cast: Option<DateTime<Utc>> = match &value {
                    Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc)),
                    Value::Number(n) => n
                        .as_i64()
                        .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
                    _ => None,
                };
                cast.map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
                    .ok_or_else(|| fail(&value))
            }
            FieldType::Object { fields } => match value {
                Value::Object(map) => Ok(Value::Object(Self::cast_object(fields, map, path)?)),
                other => Err(fail(&other)),
            },
            FieldType::Array { element_type } => match value {
                Value::Array(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        Self::cast_value(element_type, item, &format!("{}[{}]", path, i))
                    })
                    .collect::<SchemaResult<Vec<_>>>()
                    .map(Value::Array),
                other => Err(fail(&other)),
            },
        }
    }
}

impl Default for SchemaCaster {
    fn default() -> Self {
        Self::new("_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn schema() -> Schema {
        let address = BTreeMap::from([("city".to_string(), FieldDef::required(FieldType::String))]);
        Schema::new("users", BTreeMap::new())
            .field("name", FieldDef::required(FieldType::String))
            .field("age", FieldDef::optional(FieldType::Int))
            .field("score", FieldDef::optional(FieldType::Float))
            .field("active", FieldDef::optional(FieldType::Bool))
            .field("joined", FieldDef::optional(FieldType::Datetime))
            .field("address", FieldDef::optional(FieldType::Object { fields: address }))
            .field(
                "tags",
                FieldDef::optional(FieldType::Array {
                    element_type: Box::new(FieldType::Int),
                }),
            )
    }

    fn cast(value: Value) -> SchemaResult<Value> {
        SchemaCaster::default()
            .cast(&schema(), value)
            .map(Document::into_value)
    }

    #[test]
    fn test_loose_input_is_coerced() {
        let out = cast(json!({
            "_id": "u1",
            "name": 42,
            "age": "37",
            "score": "1.5",
            "active": "TRUE",
            "tags": ["1", 2]
        }))
        .unwrap();

        assert_eq!(
            out,
            json!({
                "_id": "u1",
                "name": "42",
                "age": 37,
                "score": 1.5,
                "active": true,
                "tags": [1, 2]
            })
        );
    }

    #[test]
    fn test_datetime_normalised_to_utc() {
        let out = cast(json!({"name": "a", "joined": "2024-03-01T12:00:00+02:00"})).unwrap();
        assert_eq!(out["joined"], json!("2024-03-01T10:00:00Z"));

        let out = cast(json!({"name": "a", "joined": 0})).unwrap();
        assert_eq!(out["joined"], json!("1970-01-01T00:00:00Z"));
    }

    #[test]
    fn test_uncastable_value_rejected() {
        let err = cast(json!({"name": "a", "age": "old"})).unwrap_err();
        assert_eq!(err.code().code(), "AERO_SCHEMA_CAST_FAILED");
        assert_eq!(err.field(), Some("age"));

        let err = cast(json!({"name": "a", "age": 1.5})).unwrap_err();
        assert_eq!(err.code().code(), "AERO_SCHEMA_CAST_FAILED");
    }

    #[test]
    fn test_missing_required_field() {
        let err = cast(json!({"age": 3})).unwrap_err();
        assert_eq!(err.code().code(), "AERO_SCHEMA_MISSING_FIELD");

        let err = cast(json!({"name": null})).unwrap_err();
        assert_eq!(err.code().code(), "AERO_SCHEMA_MISSING_FIELD");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = cast(json!({"name": "a", "nickname": "b"})).unwrap_err();
        assert_eq!(err.code().code(), "AERO_SCHEMA_UNKNOWN_FIELD");

        let err = cast(json!({"name": "a", "address": {"city": "x", "zip": "1"}})).unwrap_err();
        assert_eq!(err.field(), Some("address.zip"));
    }

    #[test]
    fn test_null_optional_field_dropped() {
        let out = cast(json!({"name": "a", "age": null})).unwrap();
        assert!(out.get("age").is_none());
    }

    #[test]
    fn test_array_element_path_reported() {
        let err = cast(json!({"name": "a", "tags": [1, "x"]})).unwrap_err();
        assert_eq!(err.field(), Some("tags[1]"));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = cast(json!([1, 2])).unwrap_err();
        assert_eq!(err.field(), Some("$root"));
    }
}
