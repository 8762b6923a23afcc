//! Collection service errors
//!
//! Wraps the coded errors of each subsystem. `code()` always returns the
//! underlying `AERO_*` code.

use thiserror::Error;

use crate::executor::{PageError, StoreError};
use crate::index::{IndexError, IndexErrorCode};
use crate::schema::SchemaError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of one service operation
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Record failed schema casting
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// Collection write or index provisioning failed
    #[error("{0}")]
    Index(IndexError),

    /// Page request rejected before reaching the store
    #[error("{0}")]
    Page(PageError),

    /// Backing store failed during a page fetch
    #[error("{0}")]
    Store(#[from] StoreError),

    /// No record with this identity
    #[error("[REJECT] AERO_RECORD_NOT_FOUND: Record '{0}' not found")]
    NotFound(String),

    /// Write conflicts with an existing record
    #[error("[REJECT] AERO_RECORD_CONFLICT: {0}")]
    Conflict(String),
}

impl ServiceError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Schema(e) => e.code().code(),
            ServiceError::Index(e) => e.code().code(),
            ServiceError::Page(e) => e.code(),
            ServiceError::Store(e) => e.code().code(),
            ServiceError::NotFound(_) => "AERO_RECORD_NOT_FOUND",
            ServiceError::Conflict(_) => "AERO_RECORD_CONFLICT",
        }
    }

    /// True when the caller sent something the service will never accept
    pub fn is_rejection(&self) -> bool {
        match self {
            ServiceError::Schema(_)
            | ServiceError::NotFound(_)
            | ServiceError::Conflict(_) => true,
            ServiceError::Page(e) => e.is_contract_violation(),
            ServiceError::Index(e) => !e.is_fatal(),
            ServiceError::Store(_) => false,
        }
    }
}

impl From<IndexError> for ServiceError {
    fn from(err: IndexError) -> Self {
        match err.code() {
            IndexErrorCode::AeroIndexDuplicateId => ServiceError::Conflict(err.message().to_string()),
            _ => ServiceError::Index(err),
        }
    }
}

impl From<PageError> for ServiceError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::Store(e) => ServiceError::Store(e),
            other => ServiceError::Page(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlannerError;

    #[test]
    fn test_codes_pass_through() {
        let err: ServiceError = SchemaError::missing_field("name").into();
        assert_eq!(err.code(), "AERO_SCHEMA_MISSING_FIELD");

        let err: ServiceError = PageError::Store(StoreError::bad_hint("[a:1]")).into();
        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(err.code(), "AERO_STORE_BAD_HINT");
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_duplicate_id_is_conflict() {
        let err: ServiceError = IndexError::duplicate_id("u1").into();
        assert_eq!(err.code(), "AERO_RECORD_CONFLICT");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_contract_violation_is_rejection() {
        let err: ServiceError = PageError::ContractViolation(PlannerError::sort_empty()).into();
        assert_eq!(err.code(), "AERO_PAGE_SORT_EMPTY");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_not_found_display() {
        let err = ServiceError::NotFound("u9".into());
        assert_eq!(
            err.to_string(),
            "[REJECT] AERO_RECORD_NOT_FOUND: Record 'u9' not found"
        );
    }
}
