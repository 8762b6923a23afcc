//! Schema error types
//!
//! Error codes:
//! - AERO_SCHEMA_CAST_FAILED (REJECT)
//! - AERO_SCHEMA_MISSING_FIELD (REJECT)
//! - AERO_SCHEMA_UNKNOWN_FIELD (REJECT)
//! - AERO_SCHEMA_INVALID (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Value cannot be cast to the declared type
    AeroSchemaCastFailed,
    /// Required field absent
    AeroSchemaMissingField,
    /// Field not declared by the schema
    AeroSchemaUnknownField,
    /// Schema file or structure is malformed
    AeroSchemaInvalid,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::AeroSchemaCastFailed => "AERO_SCHEMA_CAST_FAILED",
            SchemaErrorCode::AeroSchemaMissingField => "AERO_SCHEMA_MISSING_FIELD",
            SchemaErrorCode::AeroSchemaUnknownField => "AERO_SCHEMA_UNKNOWN_FIELD",
            SchemaErrorCode::AeroSchemaInvalid => "AERO_SCHEMA_INVALID",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Offending field path, if any
    field: Option<String>,
}

impl SchemaError {
    /// Value at `field` cannot become `expected`
    pub fn cast_failed(field: impl Into<String>, expected: &str, actual: &str) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AeroSchemaCastFailed,
            message: format!("Field '{}': cannot cast {} to {}", field, actual, expected),
            field: Some(field),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AeroSchemaMissingField,
            message: format!("Required field '{}' is missing", field),
            field: Some(field),
        }
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AeroSchemaUnknownField,
            message: format!("Field '{}' is not declared", field),
            field: Some(field),
        }
    }

    /// Malformed schema at `source`
    pub fn invalid(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AeroSchemaInvalid,
            message: format!("Invalid schema {}: {}", source.into(), reason.into()),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field path
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
