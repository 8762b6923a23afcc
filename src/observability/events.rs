//! Observable events for aeropage
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Pagination
    /// Page request received
    PageBegin,
    /// Page request planned
    PagePlanned,
    /// Page served
    PageComplete,
    /// Page request rejected as a contract violation
    PageRejected,
    /// Backing store failed a page fetch
    StoreError,

    // Collection
    /// Compound index provisioned
    IndexCreated,
    /// Record inserted
    RecordCreated,
    /// Record replaced
    RecordUpdated,
    /// Record removed
    RecordRemoved,

    // Realtime
    /// Change event published
    ChangePublished,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::PageBegin => "PAGE_BEGIN",
            Event::PagePlanned => "PAGE_PLANNED",
            Event::PageComplete => "PAGE_COMPLETE",
            Event::PageRejected => "PAGE_REJECTED",
            Event::StoreError => "STORE_ERROR",
            Event::IndexCreated => "INDEX_CREATED",
            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordRemoved => "RECORD_REMOVED",
            Event::ChangePublished => "CHANGE_PUBLISHED",
        }
    }

    /// Default severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreError => Severity::Error,
            Event::PageRejected => Severity::Warn,
            Event::PageBegin | Event::PagePlanned | Event::ChangePublished => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
