//! Metrics registry for aeropage
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics registry containing all operational counters
///
/// Uses Relaxed ordering: counters are independent.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Pages served
    pages_served: AtomicU64,
    /// Page requests rejected as contract violations
    pages_rejected: AtomicU64,
    /// Store failures during page fetches
    store_errors: AtomicU64,
    /// Records created, updated or removed
    records_written: AtomicU64,
    /// Change events published
    events_published: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_pages_served(&self) {
        self.pages_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_pages_rejected(&self) {
        self.pages_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_errors(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_written(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Current snapshot rendered as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_served: self.pages_served.load(Ordering::Relaxed),
            pages_rejected: self.pages_rejected.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub pages_served: u64,
    pub pages_rejected: u64,
    pub store_errors: u64,
    pub records_written: u64,
    pub events_published: u64,
}
