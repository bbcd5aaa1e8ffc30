//! Group-run storage
//!
//! Each row holds the id of the run it belongs to, where a run's id is the
//! row number of its first member. Values are therefore non-decreasing and
//! `values[values[i]] == values[i]`, which makes every ordered comparison a
//! binary search.

use std::ops::Range;
use std::sync::Arc;

use super::numeric::{resolve_numeric, NumericValue};
use super::search::{bounded_compare, indexed_compare};
use crate::column::ColumnError;
use crate::index_set::IndexSet;
use crate::query::Predicate;

#[derive(Debug, Clone)]
pub struct GroupRunStorage {
    values: Arc<[u32]>,
}

impl GroupRunStorage {
    /// Creates storage after checking the run invariants.
    pub fn try_new(values: impl Into<Arc<[u32]>>) -> Result<Self, ColumnError> {
        let values = values.into();
        for (row, &run) in values.iter().enumerate() {
            let first_of_run = values.get(run as usize).copied();
            let ordered = row == 0 || values[row - 1] <= run;
            if run as usize > row || first_of_run != Some(run) || !ordered {
                return Err(ColumnError::InvalidGroupRun {
                    row: row as u32,
                    value: run,
                });
            }
        }
        Ok(Self { values })
    }

    /// Creates storage, panicking if the run invariants do not hold.
    pub fn new(values: impl Into<Arc<[u32]>>) -> Self {
        match Self::try_new(values) {
            Ok(storage) => storage,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn size(&self) -> u32 {
        self.values.len() as u32
    }

    /// Run ids in row order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn bounded_filter(&self, predicate: &Predicate, range: Range<u32>) -> IndexSet {
        bounded_compare(resolve_numeric(predicate), range, true, |row, key| {
            self.values[row as usize].compare(key)
        })
    }

    /// Returns offsets into `positions` whose rows match.
    pub fn indexed_search(&self, predicate: &Predicate, positions: &[u32]) -> Vec<u32> {
        indexed_compare(resolve_numeric(predicate), positions, |row, key| {
            self.values[row as usize].compare(key)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs() -> GroupRunStorage {
        GroupRunStorage::new(vec![0, 0, 0, 3, 3, 3, 6, 6, 6, 9, 9, 9])
    }

    #[test]
    fn test_real_operand() {
        let res = runs().bounded_filter(&Predicate::ge(0, 1.5), 0..12);
        assert_eq!(res.size(), 9);
        assert_eq!(res.get(0), 3);
    }

    #[test]
    fn test_equal_selects_whole_run() {
        let res = runs().bounded_filter(&Predicate::eq(0, 6i64), 0..12);
        assert!(res.is_range());
        assert_eq!(res.materialize(), vec![6, 7, 8]);
        assert!(runs().bounded_filter(&Predicate::eq(0, 4i64), 0..12).is_empty());
    }

    #[test]
    fn test_indexed_search() {
        let offsets = runs().indexed_search(&Predicate::lt(0, 6i64), &[11, 4, 0, 7]);
        assert_eq!(offsets, vec![1, 2]);
    }

    #[test]
    fn test_rejects_broken_runs() {
        assert!(GroupRunStorage::try_new(vec![0, 1, 1]).is_ok());
        assert!(GroupRunStorage::try_new(vec![1, 1]).is_err());
        assert!(GroupRunStorage::try_new(vec![0, 0, 1]).is_err());
        assert!(GroupRunStorage::try_new(vec![0, 1, 0]).is_err());
    }
}
