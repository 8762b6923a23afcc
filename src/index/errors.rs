//! Collection error types
//!
//! Error codes:
//! - AERO_INDEX_MISSING_ID (ERROR)
//! - AERO_INDEX_DUPLICATE_ID (ERROR)
//! - AERO_INDEX_NOT_FOUND (ERROR)
//! - AERO_INDEX_INVALID_SPEC (ERROR)
//! - AERO_INDEX_UNAVAILABLE (FATAL)

use std::fmt;

/// Severity levels for collection errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation failed but the collection is healthy
    Error,
    /// Collection state cannot be used
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Collection-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// Record lacks an identity value
    AeroIndexMissingId,
    /// Identity already present
    AeroIndexDuplicateId,
    /// No record with this identity
    AeroIndexNotFound,
    /// Index specification names no fields
    AeroIndexInvalidSpec,
    /// Collection lock poisoned
    AeroIndexUnavailable,
}

impl IndexErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::AeroIndexMissingId => "AERO_INDEX_MISSING_ID",
            IndexErrorCode::AeroIndexDuplicateId => "AERO_INDEX_DUPLICATE_ID",
            IndexErrorCode::AeroIndexNotFound => "AERO_INDEX_NOT_FOUND",
            IndexErrorCode::AeroIndexInvalidSpec => "AERO_INDEX_INVALID_SPEC",
            IndexErrorCode::AeroIndexUnavailable => "AERO_INDEX_UNAVAILABLE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            IndexErrorCode::AeroIndexUnavailable => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Collection error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct IndexError {
    code: IndexErrorCode,
    message: String,
}

impl IndexError {
    pub fn missing_id(id_field: &str) -> Self {
        Self {
            code: IndexErrorCode::AeroIndexMissingId,
            message: format!("Record has no '{}' value", id_field),
        }
    }

    pub fn duplicate_id(id: impl fmt::Display) -> Self {
        Self {
            code: IndexErrorCode::AeroIndexDuplicateId,
            message: format!("Record {} already exists", id),
        }
    }

    pub fn not_found(id: impl fmt::Display) -> Self {
        Self {
            code: IndexErrorCode::AeroIndexNotFound,
            message: format!("Record {} not found", id),
        }
    }

    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::AeroIndexInvalidSpec,
            message: reason.into(),
        }
    }

    /// Create an unavailable error (FATAL)
    pub fn unavailable() -> Self {
        Self {
            code: IndexErrorCode::AeroIndexUnavailable,
            message: "Collection lock poisoned".into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> IndexErrorCode {
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

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for IndexError {
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

impl std::error::Error for IndexError {}

/// Result type for collection operations
pub type IndexResult<T> = Result<T, IndexError>;
