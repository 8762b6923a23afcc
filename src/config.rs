//! Paginator configuration
//!
//! Loaded from a JSON file. Every field has a default; the file may be
//! `{}`. Validation runs on load.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event, Event, Logger, Severity};
use crate::planner::DEFAULT_COUNT;

/// Configuration error (AERO_CONFIG_INVALID)
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        "AERO_CONFIG_INVALID"
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code(), self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Page size used when a caller gives none
    #[serde(default = "default_count")]
    pub default_count: u64,

    /// Largest accepted page size
    #[serde(default = "default_max_count")]
    pub max_count: u64,

    /// Identity field used as the sort tie-break
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Lowest severity written to the log
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Capacity of the change-event channel
    #[serde(default = "default_change_buffer")]
    pub change_buffer: usize,
}

fn default_count() -> u64 {
    DEFAULT_COUNT
}
fn default_max_count() -> u64 {
    1000
}
fn default_id_field() -> String {
    "_id".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_change_buffer() -> usize {
    1024
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
            id_field: default_id_field(),
            log_level: default_log_level(),
            change_buffer: default_change_buffer(),
        }
    }
}

impl PagerConfig {
    /// Load configuration from file and apply its log level
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::invalid(format!("Failed to read config: {}", e)))?;

        let config: PagerConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::invalid(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Logger::set_level(config.severity()?);

        let path_str = path.display().to_string();
        log_event(Event::ConfigLoaded, &[("path", path_str.as_str())]);

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_count == 0 {
            return Err(ConfigError::invalid("default_count must be > 0"));
        }

        if self.max_count == 0 {
            return Err(ConfigError::invalid("max_count must be > 0"));
        }

        if self.default_count > self.max_count {
            return Err(ConfigError::invalid(format!(
                "default_count ({}) exceeds max_count ({})",
                self.default_count, self.max_count
            )));
        }

        if self.id_field.trim().is_empty() {
            return Err(ConfigError::invalid("id_field must not be empty"));
        }

        if self.change_buffer == 0 {
            return Err(ConfigError::invalid("change_buffer must be > 0"));
        }

        self.severity()?;
        Ok(())
    }

    /// Configured log threshold
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("{}");
        let config = PagerConfig::load(file.path()).unwrap();
        assert_eq!(config, PagerConfig::default());
        assert_eq!(config.default_count, 20);
        assert_eq!(config.max_count, 1000);
        assert_eq!(config.id_field, "_id");
    }

    #[test]
    fn test_overrides() {
        let file = write_config(r#"{"max_count": 50, "id_field": "key", "log_level": "info"}"#);
        let config = PagerConfig::load(file.path()).unwrap();
        assert_eq!(config.max_count, 50);
        assert_eq!(config.id_field, "key");
    }

    #[test]
    fn test_default_above_max_rejected() {
        let config = PagerConfig {
            default_count: 100,
            max_count: 10,
            ..PagerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            PagerConfig {
                max_count: 0,
                ..PagerConfig::default()
            },
            PagerConfig {
                id_field: " ".into(),
                ..PagerConfig::default()
            },
            PagerConfig {
                log_level: "loud".into(),
                ..PagerConfig::default()
            },
            PagerConfig {
                change_buffer: 0,
                ..PagerConfig::default()
            },
        ];
        for config in cases {
            let err = config.validate().unwrap_err();
            assert_eq!(err.code(), "AERO_CONFIG_INVALID");
        }
    }

    #[test]
    fn test_malformed_json_rejected() {
        let file = write_config("{not json");
        let err = PagerConfig::load(file.path()).unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(PagerConfig::load(Path::new("/nonexistent/aeropage.json")).is_err());
    }
}
