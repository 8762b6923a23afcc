//! Schema loader
//!
//! Reads one schema per JSON file and keeps them by collection name.
//! Malformed files and duplicate collections fail the load.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// In-memory schema registry
#[derive(Debug, Default)]
pub struct SchemaLoader {
    schemas: HashMap<String, Schema>,
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` file in `dir`. A missing directory loads nothing.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let source = dir.display().to_string();
        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::invalid(&source, format!("Failed to read schema directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::invalid(&source, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }

        // Directory order is unspecified
        paths.sort();
        for path in &paths {
            self.load_file(path)?;
        }
        Ok(paths.len())
    }

    /// Loads a single schema file
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<&Schema> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::invalid(&source, format!("Failed to read file: {}", e)))?;

        let schema: Schema = serde_json::from_str(&content)
            .map_err(|e| SchemaError::invalid(&source, format!("Invalid JSON: {}", e)))?;

        self.insert(schema, &source)
    }

    /// Registers a schema built in code
    pub fn register(&mut self, schema: Schema) -> SchemaResult<&Schema> {
        self.insert(schema, "<in-memory>")
    }

    fn insert(&mut self, schema: Schema, source: &str) -> SchemaResult<&Schema> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::invalid(source, e))?;

        if self.schemas.contains_key(&schema.collection) {
            return Err(SchemaError::invalid(
                source,
                format!("Duplicate schema for collection '{}'", schema.collection),
            ));
        }

        let collection = schema.collection.clone();
        Ok(self.schemas.entry(collection).or_insert(schema))
    }

    /// Schema for a collection, if one is registered
    pub fn get(&self, collection: &str) -> Option<&Schema> {
        self.schemas.get(collection)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
