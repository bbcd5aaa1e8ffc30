//! Columns: a stack of index transforms around one storage
//!
//! Transforms are ordered outermost first. Filtering walks the stack through
//! `ColumnView`, one whole-range or whole-list call per layer.
//!
//! # Invariants
//!
//! - Each layer's inner size equals the size of the layer it wraps,
//!   checked once at construction
//! - Results are always expressed in the column's outer row space

mod errors;

pub use errors::{ColumnError, ColumnResult};

use std::ops::Range;

use crate::index_set::IndexSet;
use crate::query::{ComparisonOp, Predicate};
use crate::storage::ColumnStorage;
use crate::transform::IndexTransform;

/// A column: transforms (outermost first) wrapping one storage.
#[derive(Debug, Clone)]
pub struct Column {
    transforms: Vec<IndexTransform>,
    storage: ColumnStorage,
}

impl Column {
    /// Builds a column, checking every layer against the one it wraps.
    pub fn try_new(
        storage: impl Into<ColumnStorage>,
        transforms: Vec<IndexTransform>,
    ) -> ColumnResult<Self> {
        let storage = storage.into();
        let mut inner_size = storage.size();
        for (layer, transform) in transforms.iter().enumerate().rev() {
            transform.check_inner(layer, inner_size)?;
            inner_size = transform.outer_size();
        }
        Ok(Self {
            transforms,
            storage,
        })
    }

    /// Builds a column, panicking on a malformed layout.
    pub fn new(storage: impl Into<ColumnStorage>, transforms: Vec<IndexTransform>) -> Self {
        match Self::try_new(storage, transforms) {
            Ok(column) => column,
            Err(err) => panic!("[{}] {}", err.code(), err),
        }
    }

    /// A column with no transforms.
    pub fn from_storage(storage: impl Into<ColumnStorage>) -> Self {
        Self {
            transforms: Vec::new(),
            storage: storage.into(),
        }
    }

    pub fn storage(&self) -> &ColumnStorage {
        &self.storage
    }

    /// Transforms, outermost first.
    pub fn transforms(&self) -> &[IndexTransform] {
        &self.transforms
    }

    /// Number of rows in the column's outer space.
    pub fn size(&self) -> u32 {
        self.view().size()
    }

    /// A view over the full transform stack.
    pub fn view(&self) -> ColumnView<'_> {
        ColumnView::new(&self.transforms, &self.storage)
    }

    /// Rows of the contiguous `range` matching `predicate`.
    pub fn bounded_filter(&self, predicate: &Predicate, range: Range<u32>) -> IndexSet {
        self.view().bounded_filter(predicate, range)
    }

    /// Rows of `positions` matching `predicate`, in input order.
    pub fn indexed_filter(&self, predicate: &Predicate, positions: &[u32]) -> IndexSet {
        let offsets = self.view().indexed_search(predicate, positions);
        IndexSet::from_indices(offsets.into_iter().map(|o| positions[o as usize]).collect())
    }
}

/// A borrowed suffix of a column's layer stack.
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    transforms: &'a [IndexTransform],
    storage: &'a ColumnStorage,
}

impl<'a> ColumnView<'a> {
    pub fn new(transforms: &'a [IndexTransform], storage: &'a ColumnStorage) -> Self {
        Self {
            transforms,
            storage,
        }
    }

    pub fn size(&self) -> u32 {
        match self.transforms.first() {
            Some(outer) => outer.outer_size(),
            None => self.storage.size(),
        }
    }

    /// Whether any row seen through this view can be null.
    pub fn can_contain_nulls(&self) -> bool {
        self.storage.can_contain_nulls() || self.transforms.iter().any(|t| t.introduces_nulls())
    }

    fn split(&self) -> Option<(&'a IndexTransform, ColumnView<'a>)> {
        let (outer, rest) = self.transforms.split_first()?;
        Some((outer, ColumnView::new(rest, self.storage)))
    }

    /// Rows of the contiguous `range` matching `predicate`.
    pub fn bounded_filter(&self, predicate: &Predicate, range: Range<u32>) -> IndexSet {
        debug_assert!(range.end <= self.size(), "range exceeds column");
        if predicate.op.is_null_check() && !self.can_contain_nulls() {
            return match predicate.op {
                ComparisonOp::IsNotNull => IndexSet::from(range),
                _ => IndexSet::empty(),
            };
        }
        match self.split() {
            Some((outer, inner)) => outer.bounded_filter(inner, predicate, range),
            None => self.storage.bounded_filter(predicate, range),
        }
    }

    /// Offsets into `positions` whose rows match `predicate`, ascending.
    pub fn indexed_search(&self, predicate: &Predicate, positions: &[u32]) -> Vec<u32> {
        if predicate.op.is_null_check() && !self.can_contain_nulls() {
            return match predicate.op {
                ComparisonOp::IsNotNull => (0..positions.len() as u32).collect(),
                _ => Vec::new(),
            };
        }
        match self.split() {
            Some((outer, inner)) => outer.indexed_search(inner, predicate, positions),
            None => self.storage.indexed_search(predicate, positions),
        }
    }
}
