//! Observability subsystem for aeropage
//!
//! - Structured logging (JSON lines)
//! - Typed events
//! - Atomic counters
//!
//! Observability is read-only: it never changes a page or a write outcome.
//!
//! # Usage
//!
//! ```ignore
//! use aeropage::observability::{log_event, Event, MetricsRegistry};
//!
//! log_event(Event::PageComplete, &[("records", "20")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_pages_served();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event at its default severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
