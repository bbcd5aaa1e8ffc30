//! Numeric column storage
//!
//! A plain array of `u32`, `i32`, `i64` or `f64` values, optionally flagged
//! sorted. Integer operands compare exactly against integer data; anything
//! involving a real compares as IEEE doubles.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::search::{bounded_compare, indexed_compare, Resolution};
use crate::index_set::IndexSet;
use crate::query::{ComparisonOp, NumericOperand, Predicate};

/// Element types a `NumericStorage` can hold.
pub trait NumericValue: Copy + PartialOrd + fmt::Debug + Send + Sync + 'static {
    /// Type name used in log output
    const TYPE_NAME: &'static str;

    /// Orders this value against a numeric operand. `None` if unordered (NaN).
    fn compare(self, operand: NumericOperand) -> Option<Ordering>;
}

macro_rules! integer_value {
    ($t:ty, $name:expr) => {
        impl NumericValue for $t {
            const TYPE_NAME: &'static str = $name;

            fn compare(self, operand: NumericOperand) -> Option<Ordering> {
                match operand {
                    NumericOperand::Int(v) => Some((self as i64).cmp(&v)),
                    NumericOperand::Real(v) => (self as f64).partial_cmp(&v),
                }
            }
        }
    };
}

integer_value!(u32, "uint32");
integer_value!(i32, "int32");
integer_value!(i64, "int64");

impl NumericValue for f64 {
    const TYPE_NAME: &'static str = "double";

    fn compare(self, operand: NumericOperand) -> Option<Ordering> {
        match operand {
            NumericOperand::Int(v) => self.partial_cmp(&(v as f64)),
            NumericOperand::Real(v) => self.partial_cmp(&v),
        }
    }
}

/// Resolves a predicate against never-null numeric data.
///
/// Shared by identity, group-run and numeric storage.
pub(crate) fn resolve_numeric(predicate: &Predicate) -> Resolution<NumericOperand> {
    match predicate.op {
        ComparisonOp::IsNull => Resolution::Empty,
        ComparisonOp::IsNotNull => Resolution::All,
        ComparisonOp::Glob | ComparisonOp::RegexMatch => Resolution::Empty,
        op => match predicate.operand.numeric() {
            Some(key) => Resolution::Compare(op, key),
            None => Resolution::Empty,
        },
    }
}

/// Array-backed numeric storage.
#[derive(Clone)]
pub struct NumericStorage<T: NumericValue> {
    data: Arc<[T]>,
    sorted: bool,
}

impl<T: NumericValue> NumericStorage<T> {
    /// Creates unsorted storage over `data`.
    pub fn new(data: impl Into<Arc<[T]>>) -> Self {
        Self {
            data: data.into(),
            sorted: false,
        }
    }

    /// Creates storage over non-decreasing `data`, enabling binary search.
    pub fn new_sorted(data: impl Into<Arc<[T]>>) -> Self {
        let data = data.into();
        debug_assert!(
            data.windows(2).all(|w| w[0] <= w[1]),
            "sorted numeric storage must be non-decreasing"
        );
        Self { data, sorted: true }
    }

    /// Number of stored values.
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    /// Whether values were declared non-decreasing at construction.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// The stored values, in row order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Rows of `range` matching `predicate`; a range when binary search applies.
    pub fn bounded_filter(&self, predicate: &Predicate, range: Range<u32>) -> IndexSet {
        bounded_compare(resolve_numeric(predicate), range, self.sorted, |row, key| {
            self.data[row as usize].compare(key)
        })
    }

    /// Returns offsets into `positions` whose rows match.
    pub fn indexed_search(&self, predicate: &Predicate, positions: &[u32]) -> Vec<u32> {
        indexed_compare(resolve_numeric(predicate), positions, |row, key| {
            self.data[row as usize].compare(key)
        })
    }
}

impl<T: NumericValue> fmt::Debug for NumericStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericStorage")
            .field("type", &T::TYPE_NAME)
            .field("len", &self.data.len())
            .field("sorted", &self.sorted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Operand;

    #[test]
    fn test_bounded_unsorted_scan() {
        let storage = NumericStorage::new(vec![1i64, 2, 3, 4, 5]);
        let res = storage.bounded_filter(&Predicate::ge(0, 3i64), 0..5);
        assert_eq!(res.materialize(), vec![2, 3, 4]);
    }

    #[test]
    fn test_bounded_sorted_is_contiguous() {
        let storage = NumericStorage::new_sorted(vec![0i64, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let res = storage.bounded_filter(&Predicate::lt(0, 4i64), 2..10);
        assert!(res.is_range());
        assert_eq!(res.materialize(), vec![2, 3]);
    }

    #[test]
    fn test_sorted_not_equal_scans() {
        let storage = NumericStorage::new_sorted(vec![0i64, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let res = storage.bounded_filter(&Predicate::ne(0, 5i64), 0..10);
        assert_eq!(res.size(), 9);
        assert!(!res.contains(5));
    }

    #[test]
    fn test_indexed_offsets_follow_input_order() {
        let data: Vec<i64> = (0..10).map(|n| n % 5).collect();
        let storage = NumericStorage::new(data);
        let offsets = storage.indexed_search(&Predicate::lt(0, 2i64), &[9, 0, 5, 6, 1]);
        assert_eq!(offsets, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_null_checks() {
        let storage = NumericStorage::new(vec![1u32, 2, 3]);
        assert!(storage.bounded_filter(&Predicate::is_null(0), 0..3).is_empty());
        let all = storage.bounded_filter(&Predicate::is_not_null(0), 0..3);
        assert!(all.is_range());
        assert_eq!(all.size(), 3);
    }

    #[test]
    fn test_null_and_text_operands_match_nothing() {
        let storage = NumericStorage::new(vec![0i64, 1, 2, 3, 0, 1, 2, 3]);
        let pred = Predicate::new(0, ComparisonOp::GreaterOrEqual, Operand::Null);
        assert!(storage.bounded_filter(&pred, 0..8).is_empty());
        assert!(storage.bounded_filter(&Predicate::eq(0, "1"), 0..8).is_empty());
        assert!(storage.bounded_filter(&Predicate::ge(0, f64::NAN), 0..8).is_empty());
    }

    #[test]
    fn test_real_operand_on_integers() {
        let storage = NumericStorage::new_sorted(vec![1i32, 2, 2, 3]);
        assert_eq!(storage.bounded_filter(&Predicate::gt(0, 1.5), 0..4).materialize(), vec![1, 2, 3]);
        assert!(storage.bounded_filter(&Predicate::eq(0, 2.5), 0..4).is_empty());
        assert_eq!(storage.bounded_filter(&Predicate::eq(0, 2.0), 0..4).materialize(), vec![1, 2]);
    }

    #[test]
    fn test_integer_operand_on_doubles() {
        let storage = NumericStorage::new(vec![0.5f64, 1.0, 1.5, 2.0]);
        assert_eq!(storage.bounded_filter(&Predicate::le(0, 1i64), 0..4).materialize(), vec![0, 1]);
    }

    #[test]
    fn test_unsigned_against_negative_operand() {
        let storage = NumericStorage::new_sorted(vec![0u32, 5, 10]);
        assert_eq!(storage.bounded_filter(&Predicate::ge(0, -1i64), 0..3).size(), 3);
        assert!(storage.bounded_filter(&Predicate::lt(0, -1i64), 0..3).is_empty());
    }

    #[test]
    fn test_pattern_operators_match_nothing() {
        let storage = NumericStorage::new(vec![1i64, 11]);
        assert!(storage.bounded_filter(&Predicate::glob(0, "1*"), 0..2).is_empty());
        assert!(storage.indexed_search(&Predicate::regex(0, "1"), &[0, 1]).is_empty());
    }
}
