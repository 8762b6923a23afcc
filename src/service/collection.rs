//! Collection service
//!
//! Composes one collection with its schema, visibility rules and change
//! stream. Writes are serialized behind a single lock so that change events
//! are published in commit order. Reads never take the write lock.
//!
//! Write flow: cast → write to collection → publish → count.
//! Read flow: provision index → page → strip hidden fields → count.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::{ServiceError, ServiceResult};
use crate::config::PagerConfig;
use crate::executor::{Document, PageResult, Paginator};
use crate::index::{IndexError, MemoryCollection};
use crate::observability::{log_event, Event, MetricsRegistry, MetricsSnapshot};
use crate::planner::{ExplainPlan, SearchRequest};
use crate::realtime::{ChangePublisher, ChangeSubscriber};
use crate::schema::{Schema, SchemaCaster, SchemaError};
use crate::visibility::{Role, VisibilityPolicy};

/// Renders an identity value for events and messages
fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// CRUD and paging over one collection
pub struct CollectionService {
    collection: MemoryCollection,
    schema: Option<Schema>,
    caster: SchemaCaster,
    publisher: ChangePublisher,
    visibility: VisibilityPolicy,
    metrics: Arc<MetricsRegistry>,
    config: PagerConfig,
    write_lock: Mutex<()>,
}

impl CollectionService {
    /// Creates a schemaless service over an empty collection
    pub fn new(name: impl Into<String>, config: PagerConfig) -> Self {
        Self {
            collection: MemoryCollection::new(name, config.id_field.clone()),
            schema: None,
            caster: SchemaCaster::new(config.id_field.clone()),
            publisher: ChangePublisher::new(config.change_buffer),
            visibility: VisibilityPolicy::new(),
            metrics: Arc::new(MetricsRegistry::new()),
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Casts every write through `schema`
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_visibility(mut self, visibility: VisibilityPolicy) -> Self {
        self.visibility = visibility;
        self
    }

    /// Shares a metrics registry with other services
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn name(&self) -> &str {
        self.collection.name()
    }

    pub fn collection(&self) -> &MemoryCollection {
        &self.collection
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Creates a record, assigning a UUID identity when none is given
    pub fn create(&self, input: Value) -> ServiceResult<Document> {
        let mut fields = Self::object(input)?;
        let id_field = &self.config.id_field;
        if matches!(fields.get(id_field), None | Some(Value::Null)) {
            fields.insert(id_field.clone(), Value::String(Uuid::new_v4().to_string()));
        }

        let doc = self.cast(Value::Object(fields))?;
        let id = id_string(doc.value_or_null(id_field));

        let _guard = self.lock()?;
        self.collection.insert(doc.clone())?;

        self.publisher
            .publish_insert(self.name(), id.clone(), doc.clone().into_value());
        self.record_write(Event::RecordCreated, &id);
        Ok(doc)
    }

    /// Merges `patch` into an existing record.
    ///
    /// Top-level keys replace, null removes. The identity cannot change.
    pub fn update(&self, id: &Value, patch: Value) -> ServiceResult<Document> {
        let patch = Self::object(patch)?;
        let id_field = &self.config.id_field;
        if let Some(new_id) = patch.get(id_field) {
            if new_id != id {
                return Err(ServiceError::Conflict(format!(
                    "Field '{}' cannot change ({} -> {})",
                    id_field, id, new_id
                )));
            }
        }

        let _guard = self.lock()?;
        let current = self
            .collection
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(id_string(id)))?;

        let mut merged = current.into_value();
        if let Value::Object(fields) = &mut merged {
            for (name, value) in patch {
                if value.is_null() {
                    fields.remove(&name);
                } else {
                    fields.insert(name, value);
                }
            }
        }

        let doc = self.cast(merged)?;
        let old = self.collection.replace(doc.clone())?;

        let record_id = id_string(id);
        self.publisher.publish_update(
            self.name(),
            record_id.clone(),
            old.into_value(),
            doc.clone().into_value(),
        );
        self.record_write(Event::RecordUpdated, &record_id);
        Ok(doc)
    }

    /// Removes a record, returning it
    pub fn remove(&self, id: &Value) -> ServiceResult<Document> {
        let _guard = self.lock()?;
        if self.collection.get(id)?.is_none() {
            return Err(ServiceError::NotFound(id_string(id)));
        }
        let old = self.collection.remove(id)?;

        let record_id = id_string(id);
        self.publisher
            .publish_delete(self.name(), record_id.clone(), old.clone().into_value());
        self.record_write(Event::RecordRemoved, &record_id);
        Ok(old)
    }

    /// Reads one record as seen by `role`
    pub fn get(&self, id: &Value, role: Role) -> ServiceResult<Option<Document>> {
        let mut doc = self.collection.get(id)?;
        if let Some(doc) = doc.as_mut() {
            self.visibility.apply_document(doc, self.name(), role);
        }
        Ok(doc)
    }

    /// Fetches one page as seen by `role`.
    ///
    /// The index serving the request sort is provisioned on first use, and
    /// only for requests the planner accepts.
    pub fn search(&self, request: &SearchRequest, role: Role) -> ServiceResult<PageResult> {
        let paginator = Paginator::from_config(&self.collection, &self.config);
        let accepted = paginator.planner().plan(request).is_ok();
        if accepted && self.collection.ensure_index(&request.sort)? {
            let sort = request.sort.to_string();
            log_event(
                Event::IndexCreated,
                &[("collection", self.name()), ("sort", sort.as_str())],
            );
        }

        let mut page = match paginator.page(request) {
            Ok(page) => page,
            Err(err) => {
                if err.is_contract_violation() {
                    self.metrics.increment_pages_rejected();
                } else {
                    self.metrics.increment_store_errors();
                }
                return Err(err.into());
            }
        };

        self.visibility.apply_page(&mut page, self.name(), role);
        self.metrics.increment_pages_served();
        Ok(page)
    }

    /// Describes how a request would be paged, without reading records
    pub fn explain(&self, request: &SearchRequest) -> ExplainPlan {
        Paginator::from_config(&self.collection, &self.config).explain(request)
    }

    /// Subscribes to changes committed from now on
    pub fn subscribe(&self) -> ChangeSubscriber {
        self.publisher.subscribe()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn object(input: Value) -> ServiceResult<Map<String, Value>> {
        match input {
            Value::Object(fields) => Ok(fields),
            other => {
                let actual = match other {
                    Value::Array(_) => "array",
                    Value::String(_) => "string",
                    Value::Number(_) => "number",
                    Value::Bool(_) => "bool",
                    _ => "null",
                };
                Err(SchemaError::cast_failed("$root", "object", actual).into())
            }
        }
    }

    fn cast(&self, value: Value) -> ServiceResult<Document> {
        match &self.schema {
            Some(schema) => Ok(self.caster.cast(schema, value)?),
            None => Document::from_value(value)
                .ok_or_else(|| SchemaError::cast_failed("$root", "object", "value").into()),
        }
    }

    fn lock(&self) -> ServiceResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| ServiceError::Index(IndexError::unavailable()))
    }

    fn record_write(&self, event: Event, id: &str) {
        self.metrics.increment_records_written();
        self.metrics.increment_events_published();
        log_event(event, &[("collection", self.name()), ("id", id)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::SortSpec;
    use serde_json::json;

    fn service() -> CollectionService {
        CollectionService::new("users", PagerConfig::default())
    }

    #[test]
    fn test_create_assigns_uuid() {
        let service = service();
        let doc = service.create(json!({"name": "Ann"})).unwrap();
        let id = doc.get("_id").and_then(Value::as_str).unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(service.collection().len(), 1);
    }

    #[test]
    fn test_create_duplicate_conflicts() {
        let service = service();
        service.create(json!({"_id": 1})).unwrap();
        let err = service.create(json!({"_id": 1})).unwrap_err();
        assert_eq!(err.code(), "AERO_RECORD_CONFLICT");
    }

    #[test]
    fn test_update_merges_and_removes() {
        let service = service();
        service.create(json!({"_id": 1, "a": 1, "b": 2})).unwrap();
        let doc = service.update(&json!(1), json!({"a": 5, "b": null})).unwrap();
        assert_eq!(doc.into_value(), json!({"_id": 1, "a": 5}));
    }

    #[test]
    fn test_update_cannot_change_identity() {
        let service = service();
        service.create(json!({"_id": 1})).unwrap();
        let err = service.update(&json!(1), json!({"_id": 2})).unwrap_err();
        assert_eq!(err.code(), "AERO_RECORD_CONFLICT");
    }

    #[test]
    fn test_missing_record() {
        let service = service();
        assert_eq!(
            service.update(&json!(9), json!({})).unwrap_err().code(),
            "AERO_RECORD_NOT_FOUND"
        );
        assert_eq!(
            service.remove(&json!(9)).unwrap_err().code(),
            "AERO_RECORD_NOT_FOUND"
        );
        assert!(service.get(&json!(9), Role::Service).unwrap().is_none());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = service().create(json!([1])).unwrap_err();
        assert_eq!(err.code(), "AERO_SCHEMA_CAST_FAILED");
    }

    #[test]
    fn test_search_counts_pages() {
        let service = service();
        for i in 1..=3 {
            service.create(json!({"_id": i})).unwrap();
        }

        let page = service
            .search(&SearchRequest::new(SortSpec::asc("_id"), 2), Role::Service)
            .unwrap();
        assert_eq!(page.len(), 2);
        assert!(service
            .search(&SearchRequest::new(SortSpec::asc("_id"), 0), Role::Service)
            .is_err());

        let metrics = service.metrics();
        assert_eq!(metrics.pages_served, 1);
        assert_eq!(metrics.pages_rejected, 1);
        assert_eq!(service.collection().indexes().unwrap().len(), 1);
        assert_eq!(metrics.records_written, 3);
        assert_eq!(metrics.events_published, 3);
    }
}
