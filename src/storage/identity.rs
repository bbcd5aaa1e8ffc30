//! Identity storage: the value of row `i` is `i`
//!
//! Backs id columns. Always sorted and never null, so every ordered
//! comparison is a binary search over the row numbers themselves.

use std::ops::Range;

use super::numeric::{resolve_numeric, NumericValue};
use super::search::{bounded_compare, indexed_compare};
use crate::index_set::IndexSet;
use crate::query::Predicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityStorage {
    size: u32,
}

impl IdentityStorage {
    /// Storage whose row `i` holds `i`.
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Ordered comparisons binary-search the row numbers.
    pub fn bounded_filter(&self, predicate: &Predicate, range: Range<u32>) -> IndexSet {
        bounded_compare(resolve_numeric(predicate), range, true, |row, key| row.compare(key))
    }

    /// Returns offsets into `positions` whose rows match.
    pub fn indexed_search(&self, predicate: &Predicate, positions: &[u32]) -> Vec<u32> {
        indexed_compare(resolve_numeric(predicate), positions, |row, key| row.compare(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_is_single_row() {
        let storage = IdentityStorage::new(10);
        let res = storage.bounded_filter(&Predicate::eq(0, 4i64), 0..10);
        assert!(res.is_range());
        assert_eq!(res.materialize(), vec![4]);
        assert!(storage.bounded_filter(&Predicate::eq(0, 4i64), 5..10).is_empty());
    }

    #[test]
    fn test_real_operand_coerces_row() {
        let storage = IdentityStorage::new(5);
        let res = storage.bounded_filter(&Predicate::ge(0, 1.5), 0..5);
        assert_eq!(res.materialize(), vec![2, 3, 4]);
    }

    #[test]
    fn test_text_operand_is_empty_for_every_operator() {
        let storage = IdentityStorage::new(5);
        for pred in [
            Predicate::ge(0, "cheese"),
            Predicate::eq(0, "cheese"),
            Predicate::ne(0, "cheese"),
            Predicate::lt(0, "cheese"),
            Predicate::glob(0, "*"),
        ] {
            assert!(storage.bounded_filter(&pred, 0..5).is_empty(), "{}", pred);
            assert!(storage.indexed_search(&pred, &[0, 1, 2]).is_empty(), "{}", pred);
        }
    }

    #[test]
    fn test_not_equal_and_null_checks() {
        let storage = IdentityStorage::new(5);
        assert_eq!(storage.bounded_filter(&Predicate::ne(0, 3i64), 0..5).size(), 4);
        assert!(storage.bounded_filter(&Predicate::is_null(0), 0..5).is_empty());
        assert_eq!(storage.bounded_filter(&Predicate::is_not_null(0), 0..5).size(), 5);
    }

    #[test]
    fn test_indexed_search() {
        let storage = IdentityStorage::new(10);
        let offsets = storage.indexed_search(&Predicate::gt(0, 5i64), &[9, 2, 6, 6, 5]);
        assert_eq!(offsets, vec![0, 2, 3]);
    }
}
