//! Query executor
//!
//! Narrows a candidate set one predicate at a time. The set starts as the
//! full row range and stays a range for as long as every step can prove
//! contiguity; after the first list result, every later step takes the
//! indexed path.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::column::Column;
use crate::index_set::IndexSet;
use crate::observability::{LogSink, Logger, MetricsRegistry, MetricsSnapshot, Severity, StdioSink};
use crate::query::{Pattern, Predicate};

use super::config::ExecutorConfig;
use super::errors::{ExecutorError, ExecutorResult};

pub struct QueryExecutor {
    columns: Vec<Column>,
    row_count: u32,
    config: ExecutorConfig,
    metrics: MetricsRegistry,
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("columns", &self.columns)
            .field("row_count", &self.row_count)
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl QueryExecutor {
    /// Builds an executor over `columns`, each of which must span `row_count` rows.
    pub fn try_new(columns: Vec<Column>, row_count: u32) -> ExecutorResult<Self> {
        Self::try_with_config(columns, row_count, ExecutorConfig::default())
    }

    /// Like `try_new`, with explicit logging and short-circuit settings.
    pub fn try_with_config(
        columns: Vec<Column>,
        row_count: u32,
        config: ExecutorConfig,
    ) -> ExecutorResult<Self> {
        for (idx, column) in columns.iter().enumerate() {
            if column.size() != row_count {
                return Err(ExecutorError::row_count_mismatch(
                    idx,
                    row_count,
                    column.size(),
                ));
            }
        }
        Ok(Self {
            columns,
            row_count,
            config,
            metrics: MetricsRegistry::new(),
            sink: Arc::new(StdioSink),
        })
    }

    /// Panics if any column disagrees with `row_count`.
    pub fn new(columns: Vec<Column>, row_count: u32) -> Self {
        match Self::try_new(columns, row_count) {
            Ok(executor) => executor,
            Err(err) => panic!("{}", err),
        }
    }

    /// Panicking form of `try_with_config`.
    pub fn with_config(columns: Vec<Column>, row_count: u32, config: ExecutorConfig) -> Self {
        match Self::try_with_config(columns, row_count, config) {
            Ok(executor) => executor,
            Err(err) => panic!("{}", err),
        }
    }

    /// Sends log lines to `sink` instead of stdout/stderr.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Rows every column spans; unfiltered results are `0..row_count`.
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Point-in-time copy of this executor's counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Rows satisfying every predicate, ascending.
    ///
    /// Fails only when a predicate names a missing column; that check runs
    /// before any evaluation.
    pub fn try_filter(&self, predicates: &[Predicate]) -> ExecutorResult<IndexSet> {
        if let Some(bad) = predicates.iter().find(|p| p.column >= self.columns.len()) {
            let err = ExecutorError::column_not_found(bad.column, self.columns.len());
            self.log(
                err.severity(),
                "FILTER_REJECTED",
                &[("code", err.code().code()), ("message", err.message())],
            );
            return Err(err);
        }
        if self.config.should_log(Severity::Warn) {
            self.report_invalid_patterns(predicates);
        }

        self.metrics.increment_filters();
        let row_count = self.row_count.to_string();
        let predicate_count = predicates.len().to_string();
        self.log(
            Severity::Info,
            "FILTER_BEGIN",
            &[
                ("predicates", predicate_count.as_str()),
                ("row_count", row_count.as_str()),
            ],
        );

        let mut current = IndexSet::range(0, self.row_count);
        for (step, predicate) in predicates.iter().enumerate() {
            if current.is_empty() && self.config.short_circuit_empty {
                self.metrics.increment_short_circuits();
                let step = step.to_string();
                self.log(Severity::Trace, "FILTER_SHORT_CIRCUIT", &[("step", step.as_str())]);
                break;
            }
            let column = &self.columns[predicate.column];
            let rows_in = current.size();
            let path;
            current = match current.as_range() {
                Some(range) => {
                    path = "bounded";
                    self.metrics.increment_bounded_steps();
                    if column.transforms().is_empty()
                        && column.storage().is_sorted()
                        && predicate.op.supports_binary_search()
                    {
                        self.metrics.increment_binary_search_steps();
                    }
                    Self::bounded_column_filter(predicate, column, range)
                }
                None => {
                    path = "indexed";
                    self.metrics.increment_indexed_steps();
                    Self::indexed_column_filter(predicate, column, &current.into_indices())
                }
            };
            if self.config.should_log(Severity::Trace) {
                let step = step.to_string();
                let rendered = predicate.to_string();
                let rows_in = rows_in.to_string();
                let rows_out = current.size().to_string();
                self.log(
                    Severity::Trace,
                    "FILTER_STEP",
                    &[
                        ("operand", predicate.operand.kind()),
                        ("path", path),
                        ("predicate", rendered.as_str()),
                        ("rows_in", rows_in.as_str()),
                        ("rows_out", rows_out.as_str()),
                        ("step", step.as_str()),
                        ("storage", column.storage().kind()),
                    ],
                );
            }
        }

        self.metrics.add_rows_returned(u64::from(current.size()));
        let rows = current.size().to_string();
        let shape = if current.is_range() { "range" } else { "indices" };
        self.log(
            Severity::Info,
            "FILTER_COMPLETE",
            &[("rows", rows.as_str()), ("shape", shape)],
        );
        Ok(current)
    }

    /// Panics if a predicate names a missing column.
    pub fn filter(&self, predicates: &[Predicate]) -> IndexSet {
        match self.try_filter(predicates) {
            Ok(rows) => rows,
            Err(err) => panic!("{}", err),
        }
    }

    /// One bounded step: rows of `range` in `column` matching `predicate`.
    pub fn bounded_column_filter(
        predicate: &Predicate,
        column: &Column,
        range: Range<u32>,
    ) -> IndexSet {
        column.bounded_filter(predicate, range)
    }

    /// One indexed step: rows of `positions` in `column` matching `predicate`.
    pub fn indexed_column_filter(
        predicate: &Predicate,
        column: &Column,
        positions: &[u32],
    ) -> IndexSet {
        column.indexed_filter(predicate, positions)
    }

    /// Glob and regex operands that fail to compile match nothing; say so once per call.
    fn report_invalid_patterns(&self, predicates: &[Predicate]) {
        for predicate in predicates.iter().filter(|p| p.op.is_pattern()) {
            let Some(text) = predicate.operand.as_text() else {
                continue;
            };
            if let Some(Err(err)) = Pattern::compile(predicate.op, text) {
                let column = predicate.column.to_string();
                let reason = err.to_string();
                self.log(
                    Severity::Warn,
                    "FILTER_PATTERN_INVALID",
                    &[
                        ("column", column.as_str()),
                        ("op", predicate.op.as_str()),
                        ("pattern", text),
                        ("reason", reason.as_str()),
                    ],
                );
            }
        }
    }

    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if self.config.should_log(severity) {
            Logger::emit(self.sink.as_ref(), severity, event, fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitvector::BitVector;
    use crate::executor::ExecutorErrorCode;
    use crate::observability::MemorySink;
    use crate::storage::InternedStringStorage;
    use crate::strings::{StringId, StringLookup, StringPool};
    use crate::storage::{IdentityStorage, NumericStorage};
    use crate::transform::PresenceTransform;

    fn ints(values: &[i64]) -> Column {
        Column::from_storage(NumericStorage::<i64>::new(values.to_vec()))
    }

    fn sorted_ints(values: &[i64]) -> Column {
        Column::from_storage(NumericStorage::<i64>::new_sorted(values.to_vec()))
    }

    #[test]
    fn test_no_predicates_returns_all_rows() {
        let exec = QueryExecutor::new(vec![ints(&[1, 2, 3])], 3);
        let rows = exec.filter(&[]);
        assert!(rows.is_range());
        assert_eq!(rows, IndexSet::range(0, 3));
    }

    #[test]
    fn test_sorted_step_stays_range() {
        let exec = QueryExecutor::new(vec![sorted_ints(&[1, 2, 3, 4, 5])], 5);
        let rows = exec.filter(&[Predicate::ge(0, 2i64), Predicate::lt(0, 5i64)]);
        assert!(rows.is_range());
        assert_eq!(rows.materialize(), vec![1, 2, 3]);
        let m = exec.metrics();
        assert_eq!(m.bounded_steps, 2);
        assert_eq!(m.binary_search_steps, 2);
        assert_eq!(m.indexed_steps, 0);
    }

    #[test]
    fn test_degrades_to_indexed() {
        let exec = QueryExecutor::new(
            vec![ints(&[5, 1, 5, 1, 5]), Column::from_storage(IdentityStorage::new(5))],
            5,
        );
        let rows = exec.filter(&[Predicate::eq(0, 5i64), Predicate::gt(1, 1i64)]);
        assert_eq!(rows.materialize(), vec![2, 4]);
        let m = exec.metrics();
        assert_eq!(m.bounded_steps, 1);
        assert_eq!(m.indexed_steps, 1);
        assert_eq!(m.rows_returned, 2);
    }

    #[test]
    fn test_short_circuit_on_empty() {
        let exec = QueryExecutor::new(vec![ints(&[1, 2, 3])], 3);
        let rows = exec.filter(&[
            Predicate::gt(0, 10i64),
            Predicate::eq(0, 1i64),
            Predicate::eq(0, 2i64),
        ]);
        assert!(rows.is_empty());
        let m = exec.metrics();
        assert_eq!(m.short_circuits, 1);
        assert_eq!(m.bounded_steps + m.indexed_steps, 1);
    }

    #[test]
    fn test_short_circuit_disabled_same_result() {
        let config = ExecutorConfig {
            short_circuit_empty: false,
            ..ExecutorConfig::default()
        };
        let exec = QueryExecutor::with_config(vec![ints(&[1, 2, 3])], 3, config);
        let rows = exec.filter(&[Predicate::gt(0, 10i64), Predicate::eq(0, 1i64)]);
        assert!(rows.is_empty());
        assert_eq!(exec.metrics().short_circuits, 0);
    }

    #[test]
    fn test_missing_column() {
        let exec = QueryExecutor::new(vec![ints(&[1])], 1);
        let err = exec.try_filter(&[Predicate::eq(3, 1i64)]).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::ScanColumnNotFound);
        assert_eq!(exec.metrics().filters_executed, 0);
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = QueryExecutor::try_new(vec![ints(&[1, 2]), ints(&[1])], 2).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::ScanRowCountMismatch);
        assert_eq!(err.column(), Some(1));
    }

    #[test]
    #[should_panic(expected = "SCAN_ROW_COUNT_MISMATCH")]
    fn test_new_panics_on_mismatch() {
        QueryExecutor::new(vec![ints(&[1, 2])], 3);
    }

    #[test]
    fn test_presence_column_counts_outer_rows() {
        let bits = BitVector::from([1u8, 0, 1, 0]);
        let column = Column::new(
            NumericStorage::new(vec![7i64, 8]),
            vec![PresenceTransform::new(bits).into()],
        );
        let exec = QueryExecutor::new(vec![column], 4);
        assert_eq!(exec.filter(&[Predicate::is_null(0)]).materialize(), vec![1, 3]);
    }

    // =========================================================================
    // Logging
    // =========================================================================

    fn words(values: &[&str]) -> Column {
        let mut pool = StringPool::new();
        let ids: Vec<StringId> = values.iter().map(|v| pool.intern(v)).collect();
        let pool: Arc<dyn StringLookup> = Arc::new(pool);
        Column::from_storage(InternedStringStorage::new(pool, ids))
    }

    fn events(sink: &MemorySink) -> Vec<serde_json::Value> {
        sink.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_disabled_config_writes_nothing() {
        let sink = Arc::new(MemorySink::new());
        let exec =
            QueryExecutor::with_config(vec![words(&["a", "b"])], 2, ExecutorConfig::disabled())
                .with_log_sink(sink.clone());
        let rows = exec.filter(&[Predicate::regex(0, "(")]);
        assert!(rows.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_invalid_pattern_logged_once_at_warn() {
        let sink = Arc::new(MemorySink::new());
        let config = ExecutorConfig {
            min_log_severity: Severity::Warn,
            ..ExecutorConfig::enabled()
        };
        let exec = QueryExecutor::with_config(vec![words(&["a", "b"])], 2, config)
            .with_log_sink(sink.clone());
        assert!(exec.filter(&[Predicate::regex(0, "[a")]).is_empty());

        let logged = events(&sink);
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0]["event"], "FILTER_PATTERN_INVALID");
        assert_eq!(logged[0]["severity"], "WARN");
        assert_eq!(logged[0]["pattern"], "[a");
        assert_eq!(logged[0]["op"], "regex");
    }

    #[test]
    fn test_valid_pattern_not_reported() {
        let sink = Arc::new(MemorySink::new());
        let config = ExecutorConfig {
            min_log_severity: Severity::Warn,
            ..ExecutorConfig::enabled()
        };
        let exec = QueryExecutor::with_config(vec![words(&["ab", "b"])], 2, config)
            .with_log_sink(sink.clone());
        assert_eq!(exec.filter(&[Predicate::glob(0, "a*")]).materialize(), vec![0]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_trace_logs_every_step() {
        let sink = Arc::new(MemorySink::new());
        let config = ExecutorConfig {
            min_log_severity: Severity::Trace,
            ..ExecutorConfig::enabled()
        };
        let exec = QueryExecutor::with_config(vec![sorted_ints(&[1, 2, 3])], 3, config)
            .with_log_sink(sink.clone());
        exec.filter(&[Predicate::ge(0, 2i64)]);

        let logged = events(&sink);
        let names: Vec<&str> = logged.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["FILTER_BEGIN", "FILTER_STEP", "FILTER_COMPLETE"]);
        assert_eq!(logged[1]["storage"], "int64");
        assert_eq!(logged[1]["operand"], "integer");
        assert_eq!(logged[1]["path"], "bounded");
        assert_eq!(logged[2]["rows"], "2");
    }

    #[test]
    fn test_missing_column_logged_as_rejected() {
        let sink = Arc::new(MemorySink::new());
        let exec = QueryExecutor::with_config(vec![ints(&[1])], 1, ExecutorConfig::enabled())
            .with_log_sink(sink.clone());
        let err = exec.try_filter(&[Predicate::eq(2, 1i64)]).unwrap_err();

        let logged = events(&sink);
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0]["event"], "FILTER_REJECTED");
        assert_eq!(logged[0]["severity"], "ERROR");
        assert_eq!(logged[0]["code"], "SCAN_COLUMN_NOT_FOUND");
        assert_eq!(logged[0]["message"], err.message());
    }
}
