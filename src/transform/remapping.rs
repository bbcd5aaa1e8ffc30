//! Remapping transform: outer row `i` reads inner row `map[i]`
//!
//! The map may repeat, skip or reorder rows, so hits are tracked by their
//! offset in the gathered list rather than by inner row.

use std::ops::Range;
use std::sync::Arc;

use crate::column::ColumnView;
use crate::index_set::IndexSet;
use crate::query::Predicate;

#[derive(Debug, Clone)]
pub struct RemappingTransform {
    map: Arc<[u32]>,
}

impl RemappingTransform {
    /// Outer row `i` reads inner row `map[i]`.
    pub fn new(map: impl Into<Arc<[u32]>>) -> Self {
        Self { map: map.into() }
    }

    /// Length of the map.
    pub fn outer_size(&self) -> u32 {
        self.map.len() as u32
    }

    pub fn map(&self) -> &[u32] {
        &self.map
    }

    /// First `(outer row, target)` pointing at or past `inner_size`.
    pub(crate) fn first_out_of_bounds(&self, inner_size: u32) -> Option<(u32, u32)> {
        self.map
            .iter()
            .enumerate()
            .find(|(_, &target)| target >= inner_size)
            .map(|(row, &target)| (row as u32, target))
    }

    pub(crate) fn bounded_filter(
        &self,
        inner: ColumnView<'_>,
        predicate: &Predicate,
        range: Range<u32>,
    ) -> IndexSet {
        let gathered = &self.map[range.start as usize..range.end as usize];
        let hits = inner.indexed_search(predicate, gathered);
        IndexSet::from_indices(hits.into_iter().map(|h| range.start + h).collect())
    }

    pub(crate) fn indexed_search(
        &self,
        inner: ColumnView<'_>,
        predicate: &Predicate,
        positions: &[u32],
    ) -> Vec<u32> {
        let gathered: Vec<u32> = positions.iter().map(|&p| self.map[p as usize]).collect();
        inner.indexed_search(predicate, &gathered)
    }
}
