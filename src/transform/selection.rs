//! Selection transform: a dense, order-preserving sub-sequence
//!
//! Outer row `i` is the position of the `(i+1)`-th set bit. An outer range
//! maps to an ordered but generally gapped list of inner rows, so the wrapped
//! layer is always searched by position list.

use std::ops::Range;

use crate::bitvector::{BitVector, RankedBits};
use crate::column::ColumnView;
use crate::index_set::IndexSet;
use crate::query::Predicate;

#[derive(Debug, Clone)]
pub struct SelectionTransform {
    selection: RankedBits,
}

impl SelectionTransform {
    pub fn new(selection: BitVector) -> Self {
        Self {
            selection: RankedBits::new(selection),
        }
    }

    /// Rows seen from above: the count of selected bits.
    pub fn outer_size(&self) -> u32 {
        self.selection.count_ones()
    }

    /// Rows of the layer below: the selection's length.
    pub fn inner_size(&self) -> u32 {
        self.selection.len()
    }

    /// Inner row for outer row `row`.
    pub fn to_inner(&self, row: u32) -> u32 {
        self.selection.select(row)
    }

    pub(crate) fn bounded_filter(
        &self,
        inner: ColumnView<'_>,
        predicate: &Predicate,
        range: Range<u32>,
    ) -> IndexSet {
        if range.is_empty() {
            return IndexSet::empty();
        }
        let first = self.selection.select(range.start);
        let inner_rows: Vec<u32> = self
            .selection
            .ones_from(first)
            .take(range.len())
            .collect();
        let hits = inner.indexed_search(predicate, &inner_rows);
        IndexSet::from_indices(hits.into_iter().map(|h| range.start + h).collect())
    }

    pub(crate) fn indexed_search(
        &self,
        inner: ColumnView<'_>,
        predicate: &Predicate,
        positions: &[u32],
    ) -> Vec<u32> {
        let inner_rows: Vec<u32> = positions.iter().map(|&p| self.selection.select(p)).collect();
        inner.indexed_search(predicate, &inner_rows)
    }
}
