//! Predicate model consumed from the upstream planner
//!
//! A predicate list is a conjunction: a row survives only if every predicate
//! accepts it. The result never depends on the order of the list.

mod pattern;
mod predicate;

pub use pattern::Pattern;
pub use predicate::{ComparisonOp, NumericOperand, Operand, Predicate};
