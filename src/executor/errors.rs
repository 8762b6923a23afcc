//! Store and page error types
//!
//! Store error codes:
//! - AERO_STORE_QUERY_FAILED (ERROR)
//! - AERO_STORE_BAD_HINT (ERROR)
//! - AERO_STORE_BAD_CURSOR (ERROR)
//! - AERO_STORE_UNAVAILABLE (FATAL)
//!
//! Store errors are propagated unmodified: never retried, never mapped to an
//! empty page.

use std::fmt;

use thiserror::Error;

use crate::planner::PlannerError;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation failed but the store is healthy
    Error,
    /// Store cannot serve reads
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

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// General query failure
    AeroStoreQueryFailed,
    /// No index matches the hint
    AeroStoreBadHint,
    /// Range cursor keys do not match the hint fields
    AeroStoreBadCursor,
    /// Store state cannot be read
    AeroStoreUnavailable,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::AeroStoreQueryFailed => "AERO_STORE_QUERY_FAILED",
            StoreErrorCode::AeroStoreBadHint => "AERO_STORE_BAD_HINT",
            StoreErrorCode::AeroStoreBadCursor => "AERO_STORE_BAD_CURSOR",
            StoreErrorCode::AeroStoreUnavailable => "AERO_STORE_UNAVAILABLE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::AeroStoreUnavailable => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
}

impl StoreError {
    /// Create a query failed error
    pub fn query_failed(reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::AeroStoreQueryFailed,
            message: reason.into(),
        }
    }

    /// Create a bad hint error
    pub fn bad_hint(hint: impl fmt::Display) -> Self {
        Self {
            code: StoreErrorCode::AeroStoreBadHint,
            message: format!("No index matches hint {}", hint),
        }
    }

    /// Create a bad cursor error
    pub fn bad_cursor(hint: impl fmt::Display) -> Self {
        Self {
            code: StoreErrorCode::AeroStoreBadCursor,
            message: format!("Cursor keys do not match hint {}", hint),
        }
    }

    /// Create an unavailable error (FATAL)
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::AeroStoreUnavailable,
            message: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
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

impl fmt::Display for StoreError {
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

impl std::error::Error for StoreError {}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of one page request
#[derive(Debug, Error)]
pub enum PageError {
    /// Caller misuse, detected before the store is touched
    #[error("{0}")]
    ContractViolation(#[from] PlannerError),

    /// Backing store failure, passed through unchanged
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl PageError {
    /// Returns the string code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            PageError::ContractViolation(e) => e.code().code(),
            PageError::Store(e) => e.code().code(),
        }
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        match self {
            PageError::ContractViolation(e) => e.message(),
            PageError::Store(e) => e.message(),
        }
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, PageError::ContractViolation(_))
    }
}

/// Result type for page requests
pub type PageOutcome<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            StoreErrorCode::AeroStoreQueryFailed.code(),
            "AERO_STORE_QUERY_FAILED"
        );
        assert_eq!(StoreErrorCode::AeroStoreBadHint.code(), "AERO_STORE_BAD_HINT");
        assert_eq!(
            StoreErrorCode::AeroStoreBadCursor.code(),
            "AERO_STORE_BAD_CURSOR"
        );
    }

    #[test]
    fn test_unavailable_is_fatal() {
        let err = StoreError::unavailable("lock poisoned");
        assert!(err.is_fatal());
        assert!(!StoreError::query_failed("x").is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::bad_hint("[age:1,_id:1]");
        let display = format!("{}", err);
        assert!(display.contains("ERROR"));
        assert!(display.contains("AERO_STORE_BAD_HINT"));
        assert!(display.contains("[age:1,_id:1]"));
    }

    #[test]
    fn test_page_error_code_visible() {
        let err: PageError = StoreError::bad_cursor("[a:1]").into();
        assert_eq!(err.code(), "AERO_STORE_BAD_CURSOR");
        assert!(!err.is_contract_violation());

        let err: PageError = PlannerError::sort_empty().into();
        assert_eq!(err.code(), "AERO_PAGE_SORT_EMPTY");
        assert!(err.is_contract_violation());
    }
}
