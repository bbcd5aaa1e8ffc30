//! Observability for filter execution
//!
//! - Structured JSON log lines, one event per line, sent to a `LogSink`
//! - Lock-free counters for filter activity
//!
//! Observability is read-only: nothing here changes a filter's result.

mod logger;
mod metrics;

pub use logger::{LogSink, Logger, MemorySink, Severity, StdioSink};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
