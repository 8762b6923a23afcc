//! # Change Publishing Errors

use thiserror::Error;

/// Result type for change subscriptions
pub type RealtimeResult<T> = Result<T, RealtimeError>;

/// Errors seen by a change subscriber
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    /// Publisher dropped
    #[error("Change stream closed")]
    Closed,

    /// Subscriber fell behind and missed events
    #[error("Subscriber lagged, {0} events skipped")]
    Lagged(u64),
}

impl RealtimeError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RealtimeError::Closed => "AERO_CHANGES_CLOSED",
            RealtimeError::Lagged(_) => "AERO_CHANGES_LAGGED",
        }
    }
}
