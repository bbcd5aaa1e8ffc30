//! Presence transform: a sparse, nullable view
//!
//! Outer row `i` is null when bit `i` is clear; otherwise it reads inner row
//! `rank(i)`. The present rows of any outer range `[a, b)` occupy exactly the
//! inner range `[rank(a), rank(b))`, so bounded searches stay bounded (and
//! keep binary search) one layer down.

use std::ops::Range;

use crate::bitvector::{BitVector, RankedBits};
use crate::column::ColumnView;
use crate::index_set::IndexSet;
use crate::query::{ComparisonOp, Predicate};

#[derive(Debug, Clone)]
pub struct PresenceTransform {
    presence: RankedBits,
}

impl PresenceTransform {
    pub fn new(presence: BitVector) -> Self {
        Self {
            presence: RankedBits::new(presence),
        }
    }

    pub fn outer_size(&self) -> u32 {
        self.presence.len()
    }

    /// Rows held by the layer below: the count of set bits.
    pub fn inner_size(&self) -> u32 {
        self.presence.count_ones()
    }

    /// Returns true if any outer row reads as null here.
    pub fn has_absent_rows(&self) -> bool {
        self.presence.count_ones() < self.presence.len()
    }

    /// Inner row for a present outer row.
    pub fn to_inner(&self, row: u32) -> Option<u32> {
        self.presence.get(row).then(|| self.presence.rank(row))
    }

    /// Outer rows for an ascending set of inner rows.
    fn to_outer(&self, inner: IndexSet) -> IndexSet {
        match inner {
            IndexSet::Range { start, end } if start == end => IndexSet::empty(),
            IndexSet::Range { start, end } => {
                let first = self.presence.select(start);
                let last = self.presence.select(end - 1);
                if last - first == end - start - 1 {
                    IndexSet::range(first, last + 1)
                } else {
                    IndexSet::from_indices(
                        self.presence.ones_from(first).take((end - start) as usize).collect(),
                    )
                }
            }
            IndexSet::Indices(rows) => {
                IndexSet::from_indices(rows.into_iter().map(|r| self.presence.select(r)).collect())
            }
        }
    }

    fn absent_in(&self, range: Range<u32>) -> IndexSet {
        let present = self.presence.rank(range.end) - self.presence.rank(range.start);
        if present == 0 {
            return IndexSet::from(range);
        }
        if present == range.end - range.start {
            return IndexSet::empty();
        }
        IndexSet::from_indices(range.filter(|&row| !self.presence.get(row)).collect())
    }

    pub(crate) fn bounded_filter(
        &self,
        inner: ColumnView<'_>,
        predicate: &Predicate,
        range: Range<u32>,
    ) -> IndexSet {
        let inner_range = self.presence.rank(range.start)..self.presence.rank(range.end);

        if predicate.op != ComparisonOp::IsNull {
            return self.to_outer(inner.bounded_filter(predicate, inner_range));
        }

        let absent = self.absent_in(range);
        if !inner.can_contain_nulls() {
            return absent;
        }
        let inner_nulls = self.to_outer(inner.bounded_filter(predicate, inner_range));
        IndexSet::from_indices(merge_ascending(&absent.materialize(), &inner_nulls.materialize()))
    }

    pub(crate) fn indexed_search(
        &self,
        inner: ColumnView<'_>,
        predicate: &Predicate,
        positions: &[u32],
    ) -> Vec<u32> {
        let is_null = predicate.op == ComparisonOp::IsNull;
        let mut absent_offsets = Vec::new();
        let mut present_offsets = Vec::with_capacity(positions.len());
        let mut inner_rows = Vec::with_capacity(positions.len());
        for (offset, &row) in positions.iter().enumerate() {
            if self.presence.get(row) {
                present_offsets.push(offset as u32);
                inner_rows.push(self.presence.rank(row));
            } else if is_null {
                absent_offsets.push(offset as u32);
            }
        }

        if is_null && !inner.can_contain_nulls() {
            return absent_offsets;
        }
        let hits: Vec<u32> = inner
            .indexed_search(predicate, &inner_rows)
            .into_iter()
            .map(|h| present_offsets[h as usize])
            .collect();
        if is_null {
            merge_ascending(&absent_offsets, &hits)
        } else {
            hits
        }
    }
}

/// Merges two ascending, disjoint lists.
fn merge_ascending(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::storage::NumericStorage;
    use crate::transform::SelectionTransform;

    fn sparse() -> Column {
        Column::new(
            NumericStorage::new(vec![0i64, 1, 2, 3, 4]),
            vec![PresenceTransform::new(BitVector::from([1u8, 1, 0, 1, 1, 0, 0, 0, 1, 0])).into()],
        )
    }

    #[test]
    fn test_to_inner() {
        let t = PresenceTransform::new(BitVector::from([1u8, 0, 1, 1]));
        assert_eq!(t.to_inner(0), Some(0));
        assert_eq!(t.to_inner(1), None);
        assert_eq!(t.to_inner(3), Some(2));
    }

    #[test]
    fn test_bounded_comparison() {
        let res = sparse().bounded_filter(&Predicate::ge(0, 3i64), 0..10);
        assert_eq!(res.materialize(), vec![4, 8]);
    }

    #[test]
    fn test_bounded_is_null() {
        let res = sparse().bounded_filter(&Predicate::is_null(0), 0..10);
        assert_eq!(res.materialize(), vec![2, 5, 6, 7, 9]);
        let res = sparse().bounded_filter(&Predicate::is_null(0), 5..8);
        assert!(res.is_range());
        assert_eq!(res.size(), 3);
    }

    #[test]
    fn test_bounded_is_not_null_keeps_dense_runs() {
        let res = sparse().bounded_filter(&Predicate::is_not_null(0), 0..2);
        assert!(res.is_range());
        let res = sparse().bounded_filter(&Predicate::is_not_null(0), 0..10);
        assert_eq!(res.materialize(), vec![0, 1, 3, 4, 8]);
    }

    #[test]
    fn test_indexed_comparison() {
        let values: Vec<i64> = (0..6).map(|n| n % 3).collect();
        let col = Column::new(
            NumericStorage::new(values),
            vec![PresenceTransform::new(BitVector::from([1u8, 1, 0, 1, 1, 0, 1, 0, 0, 1])).into()],
        );
        let positions: Vec<u32> = (0..10).collect();
        let res = col.indexed_filter(&Predicate::ge(0, 1i64), &positions);
        assert_eq!(res.materialize(), vec![1, 3, 6, 9]);
    }

    #[test]
    fn test_indexed_is_null() {
        let positions: Vec<u32> = (0..10).collect();
        let res = sparse().indexed_filter(&Predicate::is_null(0), &positions);
        assert_eq!(res.materialize(), vec![2, 5, 6, 7, 9]);
    }

    #[test]
    fn test_nested_nulls_partition() {
        // Inner: {NULL, 10, 20, NULL, 30} through a presence layer.
        // Outer: {NULL, NULL, 10, 20, NULL, NULL, 30}
        let inner_bits = BitVector::from([0u8, 1, 1, 0, 1]);
        let outer_bits = BitVector::from([1u8, 0, 1, 1, 1, 0, 1]);
        let col = Column::new(
            NumericStorage::new(vec![10i64, 20, 30]),
            vec![
                PresenceTransform::new(outer_bits).into(),
                PresenceTransform::new(inner_bits).into(),
            ],
        );
        let nulls = col.bounded_filter(&Predicate::is_null(0), 0..7);
        let not_nulls = col.bounded_filter(&Predicate::is_not_null(0), 0..7);
        assert_eq!(nulls.materialize(), vec![0, 1, 4, 5]);
        assert_eq!(not_nulls.materialize(), vec![2, 3, 6]);

        let positions = [6, 5, 4, 0];
        assert_eq!(col.indexed_filter(&Predicate::is_null(0), &positions).materialize(), vec![5, 4, 0]);
    }

    #[test]
    fn test_under_selection() {
        // Storage {0, 1, 2, 3, 0, 1, 2, 3}
        // With nulls: {0, 1, NULL, 2, 3, 0, NULL, NULL, 1, 2, 3, NULL}
        // Selected:   {0, NULL, 3, NULL, 1, 3}
        let col = Column::new(
            NumericStorage::new(vec![0i64, 1, 2, 3, 0, 1, 2, 3]),
            vec![
                SelectionTransform::new(BitVector::from([1u8, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0])).into(),
                PresenceTransform::new(BitVector::from([1u8, 1, 0, 1, 1, 1, 0, 0, 1, 1, 1, 0])).into(),
            ],
        );
        assert_eq!(col.bounded_filter(&Predicate::ge(0, 2i64), 0..6).materialize(), vec![2, 5]);
        assert_eq!(col.bounded_filter(&Predicate::is_null(0), 0..6).materialize(), vec![1, 3]);
    }

    #[test]
    fn test_merge_ascending() {
        assert_eq!(merge_ascending(&[1, 4, 9], &[2, 3, 10]), vec![1, 2, 3, 4, 9, 10]);
        assert_eq!(merge_ascending(&[], &[2]), vec![2]);
    }
}
