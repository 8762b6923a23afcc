//! Planner error types
//!
//! Every planner error is a contract violation: the caller misused the
//! pagination API and the request is rejected before the store is touched.
//!
//! Error codes:
//! - AERO_PAGE_COUNT_INVALID (REJECT)
//! - AERO_PAGE_COUNT_TOO_LARGE (REJECT)
//! - AERO_PAGE_SORT_EMPTY (REJECT)
//! - AERO_PAGE_DIRECTION_REQUIRED (REJECT)
//! - AERO_PAGE_CURSOR_INVALID (REJECT)

use std::fmt;

/// Severity levels for planner errors
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

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Page size below 1
    AeroPageCountInvalid,
    /// Page size above the configured maximum
    AeroPageCountTooLarge,
    /// Sort specification has no keys
    AeroPageSortEmpty,
    /// Cursor supplied without a direction
    AeroPageDirectionRequired,
    /// Cursor token could not be decoded
    AeroPageCursorInvalid,
}

impl PlannerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::AeroPageCountInvalid => "AERO_PAGE_COUNT_INVALID",
            PlannerErrorCode::AeroPageCountTooLarge => "AERO_PAGE_COUNT_TOO_LARGE",
            PlannerErrorCode::AeroPageSortEmpty => "AERO_PAGE_SORT_EMPTY",
            PlannerErrorCode::AeroPageDirectionRequired => "AERO_PAGE_DIRECTION_REQUIRED",
            PlannerErrorCode::AeroPageCursorInvalid => "AERO_PAGE_CURSOR_INVALID",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerError {
    code: PlannerErrorCode,
    message: String,
}

impl PlannerError {
    /// Page size below 1
    pub fn count_invalid(count: u64) -> Self {
        Self {
            code: PlannerErrorCode::AeroPageCountInvalid,
            message: format!("Page count must be at least 1, got {}", count),
        }
    }

    /// Page size above the configured maximum
    pub fn count_too_large(count: u64, max: u64) -> Self {
        Self {
            code: PlannerErrorCode::AeroPageCountTooLarge,
            message: format!("Page count {} exceeds the maximum of {}", count, max),
        }
    }

    /// Sort specification has no keys
    pub fn sort_empty() -> Self {
        Self {
            code: PlannerErrorCode::AeroPageSortEmpty,
            message: "Sort specification must name at least one field".into(),
        }
    }

    /// Cursor supplied without a direction
    pub fn direction_required() -> Self {
        Self {
            code: PlannerErrorCode::AeroPageDirectionRequired,
            message: "A direction is required when a cursor is supplied".into(),
        }
    }

    /// Cursor token could not be decoded
    pub fn cursor_invalid(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::AeroPageCursorInvalid,
            message: format!("Invalid cursor: {}", reason.into()),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
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
}

impl fmt::Display for PlannerError {
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

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PlannerErrorCode::AeroPageCountInvalid.code(),
            "AERO_PAGE_COUNT_INVALID"
        );
        assert_eq!(
            PlannerErrorCode::AeroPageDirectionRequired.code(),
            "AERO_PAGE_DIRECTION_REQUIRED"
        );
        assert_eq!(
            PlannerErrorCode::AeroPageCursorInvalid.code(),
            "AERO_PAGE_CURSOR_INVALID"
        );
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::count_too_large(5000, 1000);
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("AERO_PAGE_COUNT_TOO_LARGE"));
        assert!(display.contains("5000"));
    }
}
