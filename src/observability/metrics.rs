//! Filter counters
//!
//! Monotonic `AtomicU64` counters with relaxed ordering; concurrent queries
//! on one executor may bump them freely.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    filters_executed: AtomicU64,
    bounded_steps: AtomicU64,
    indexed_steps: AtomicU64,
    binary_search_steps: AtomicU64,
    short_circuits: AtomicU64,
    rows_returned: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_filters(&self) {
        self.filters_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_bounded_steps(&self) {
        self.bounded_steps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_indexed_steps(&self) {
        self.indexed_steps.fetch_add(1, Ordering::Relaxed);
    }

    /// A bounded step over an untransformed sorted storage.
    pub fn increment_binary_search_steps(&self) {
        self.binary_search_steps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_short_circuits(&self) {
        self.short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rows_returned(&self, rows: u64) {
        self.rows_returned.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_executed: self.filters_executed.load(Ordering::Relaxed),
            bounded_steps: self.bounded_steps.load(Ordering::Relaxed),
            indexed_steps: self.indexed_steps.load(Ordering::Relaxed),
            binary_search_steps: self.binary_search_steps.load(Ordering::Relaxed),
            short_circuits: self.short_circuits.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub filters_executed: u64,
    pub bounded_steps: u64,
    pub indexed_steps: u64,
    pub binary_search_steps: u64,
    pub short_circuits: u64,
    pub rows_returned: u64,
}
