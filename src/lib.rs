//! colscan - predicate filtering over layered in-memory columns
//!
//! A column is a base storage wrapped by zero or more index transforms
//! (presence, selection, remapping). The [`executor::QueryExecutor`] narrows
//! a set of row indices predicate by predicate, keeping it a contiguous
//! range while it can and falling back to explicit index lists once a step
//! breaks contiguity.

pub mod bitvector;
pub mod column;
pub mod executor;
pub mod index_set;
pub mod observability;
pub mod query;
pub mod storage;
pub mod strings;
pub mod transform;

pub use column::{Column, ColumnError, ColumnResult, ColumnView};
pub use executor::{ExecutorConfig, ExecutorError, ExecutorErrorCode, ExecutorResult, QueryExecutor};
pub use index_set::IndexSet;
pub use query::{ComparisonOp, Operand, Predicate};
pub use storage::ColumnStorage;
pub use transform::IndexTransform;
