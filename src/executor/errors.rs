//! Executor error types
//!
//! Error codes:
//! - SCAN_COLUMN_NOT_FOUND (ERROR)
//! - SCAN_ROW_COUNT_MISMATCH (ERROR)

use std::fmt;

use crate::observability::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// A predicate names a column the executor does not hold
    ScanColumnNotFound,
    /// A column's outer size differs from the table row count
    ScanRowCountMismatch,
}

impl ExecutorErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::ScanColumnNotFound => "SCAN_COLUMN_NOT_FOUND",
            ExecutorErrorCode::ScanRowCountMismatch => "SCAN_ROW_COUNT_MISMATCH",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
    column: Option<usize>,
}

impl ExecutorError {
    pub fn column_not_found(column: usize, column_count: usize) -> Self {
        Self {
            code: ExecutorErrorCode::ScanColumnNotFound,
            message: format!(
                "predicate references column {} but only {} columns exist",
                column, column_count
            ),
            column: Some(column),
        }
    }

    pub fn row_count_mismatch(column: usize, expected: u32, actual: u32) -> Self {
        Self {
            code: ExecutorErrorCode::ScanRowCountMismatch,
            message: format!(
                "column {} has {} rows, table has {}",
                column, actual, expected
            ),
            column: Some(column),
        }
    }

    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The offending column index, if any.
    pub fn column(&self) -> Option<usize> {
        self.column
    }
}

impl fmt::Display for ExecutorError {
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

impl std::error::Error for ExecutorError {}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
