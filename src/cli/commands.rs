//! CLI command implementations
//!
//! Each command is one-shot: load configuration, read one request from
//! stdin, write one response to stdout. Failures are written as an error
//! response and the process exits non-zero.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::PagerConfig;
use crate::executor::{Document, Paginator};
use crate::index::MemoryCollection;
use crate::observability::{log_event, Event};
use crate::planner::SearchRequest;
use crate::schema::{SchemaCaster, SchemaLoader};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Collection name used for data files
const DATA_COLLECTION: &str = "data";

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let result = run_command(cli.command);
    if let Err(err) = &result {
        write_error(err.code_str(), err.message())?;
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Page {
            config,
            data,
            schema,
        } => page(&config, &data, schema.as_deref()),
        Command::Explain { config } => explain(&config),
    }
}

/// Fetch one page from a data file
pub fn page(config_path: &Path, data_path: &Path, schema_path: Option<&Path>) -> CliResult<()> {
    let config = PagerConfig::load(config_path)?;
    let request: SearchRequest = read_request()?;

    let collection = load_data(&config, data_path, schema_path)?;
    let paginator = Paginator::from_config(&collection, &config);
    if paginator.planner().plan(&request).is_ok() && collection.ensure_index(&request.sort)? {
        let sort = request.sort.to_string();
        log_event(
            Event::IndexCreated,
            &[("collection", collection.name()), ("sort", sort.as_str())],
        );
    }

    let result = paginator.page(&request)?;
    write_response(serde_json::to_value(&result)?)
}

/// Describe how a request would be paged
pub fn explain(config_path: &Path) -> CliResult<()> {
    let config = PagerConfig::load(config_path)?;
    let request: SearchRequest = read_request()?;

    let collection = MemoryCollection::new(DATA_COLLECTION, config.id_field.clone());
    let plan = Paginator::from_config(&collection, &config).explain(&request);
    write_response(serde_json::to_value(&plan)?)
}

/// Loads a JSON array of records, casting each through the schema if given
fn load_data(
    config: &PagerConfig,
    data_path: &Path,
    schema_path: Option<&Path>,
) -> CliResult<MemoryCollection> {
    let schema = match schema_path {
        Some(path) => {
            let mut loader = SchemaLoader::new();
            Some(loader.load_file(path)?.clone())
        }
        None => None,
    };
    let caster = SchemaCaster::new(config.id_field.clone());

    let content = fs::read_to_string(data_path).map_err(|e| {
        CliError::data_error(format!("Failed to read {}: {}", data_path.display(), e))
    })?;
    let records: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
        CliError::data_error(format!("{} is not a JSON array: {}", data_path.display(), e))
    })?;

    let collection = MemoryCollection::new(DATA_COLLECTION, config.id_field.clone());
    for (i, record) in records.into_iter().enumerate() {
        let doc = match &schema {
            Some(schema) => caster.cast(schema, record)?,
            None => Document::from_value(record)
                .ok_or_else(|| CliError::data_error(format!("Record {} is not an object", i)))?,
        };
        collection.insert(doc)?;
    }
    Ok(collection)
}
