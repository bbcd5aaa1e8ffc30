//! Predicate-by-predicate filtering over a set of columns
//!
//! # Execution flow
//!
//! 1. Start with every row: the range `[0, row_count)`
//! 2. For each predicate in order, narrow the candidate set on its column
//!    - contiguous candidates: bounded filter
//!    - listed candidates: indexed filter
//! 3. Return the final set in the table's row space
//!
//! # Invariants
//!
//! - Results are ascending and free of duplicates
//! - Once a step yields a list, later steps never see a range again
//! - Evaluation never mutates columns; queries may run concurrently

mod config;
mod errors;
mod executor;

pub use config::ExecutorConfig;
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::QueryExecutor;
