//! Index transforms: overlays between a column's outer rows and its storage
//!
//! - `PresenceTransform`: sparse/nullable view, absent rows are null
//! - `SelectionTransform`: dense, order-preserving sub-sequence
//! - `RemappingTransform`: arbitrary map, may repeat, skip or reorder
//!
//! Each layer translates a whole range or list into the wrapped layer's
//! space, delegates once, and translates the hits back.

mod presence;
mod remapping;
mod selection;

pub use presence::PresenceTransform;
pub use remapping::RemappingTransform;
pub use selection::SelectionTransform;

use std::ops::Range;

use crate::column::{ColumnError, ColumnView};
use crate::index_set::IndexSet;
use crate::query::Predicate;

#[derive(Debug, Clone)]
pub enum IndexTransform {
    Presence(PresenceTransform),
    Selection(SelectionTransform),
    Remapping(RemappingTransform),
}

impl IndexTransform {
    /// Number of rows this layer exposes.
    pub fn outer_size(&self) -> u32 {
        match self {
            IndexTransform::Presence(t) => t.outer_size(),
            IndexTransform::Selection(t) => t.outer_size(),
            IndexTransform::Remapping(t) => t.outer_size(),
        }
    }

    /// Returns the transform kind used in errors and log output
    pub fn kind(&self) -> &'static str {
        match self {
            IndexTransform::Presence(_) => "presence",
            IndexTransform::Selection(_) => "selection",
            IndexTransform::Remapping(_) => "remapping",
        }
    }

    /// Whether this layer itself makes some outer rows null.
    pub fn introduces_nulls(&self) -> bool {
        match self {
            IndexTransform::Presence(t) => t.has_absent_rows(),
            IndexTransform::Selection(_) | IndexTransform::Remapping(_) => false,
        }
    }

    /// Checks this layer against the size of the layer it wraps.
    pub(crate) fn check_inner(&self, layer: usize, inner_size: u32) -> Result<(), ColumnError> {
        let expected = match self {
            IndexTransform::Presence(t) => t.inner_size(),
            IndexTransform::Selection(t) => t.inner_size(),
            IndexTransform::Remapping(t) => {
                return match t.first_out_of_bounds(inner_size) {
                    Some((row, target)) => Err(ColumnError::RemapOutOfBounds {
                        layer,
                        row,
                        target,
                        inner_size,
                    }),
                    None => Ok(()),
                };
            }
        };
        if expected != inner_size {
            return Err(ColumnError::LayerSizeMismatch {
                layer,
                transform: self.kind(),
                expected,
                actual: inner_size,
            });
        }
        Ok(())
    }

    pub(crate) fn bounded_filter(
        &self,
        inner: ColumnView<'_>,
        predicate: &Predicate,
        range: Range<u32>,
    ) -> IndexSet {
        match self {
            IndexTransform::Presence(t) => t.bounded_filter(inner, predicate, range),
            IndexTransform::Selection(t) => t.bounded_filter(inner, predicate, range),
            IndexTransform::Remapping(t) => t.bounded_filter(inner, predicate, range),
        }
    }

    pub(crate) fn indexed_search(
        &self,
        inner: ColumnView<'_>,
        predicate: &Predicate,
        positions: &[u32],
    ) -> Vec<u32> {
        match self {
            IndexTransform::Presence(t) => t.indexed_search(inner, predicate, positions),
            IndexTransform::Selection(t) => t.indexed_search(inner, predicate, positions),
            IndexTransform::Remapping(t) => t.indexed_search(inner, predicate, positions),
        }
    }
}

impl From<PresenceTransform> for IndexTransform {
    fn from(t: PresenceTransform) -> Self {
        IndexTransform::Presence(t)
    }
}

impl From<SelectionTransform> for IndexTransform {
    fn from(t: SelectionTransform) -> Self {
        IndexTransform::Selection(t)
    }
}

impl From<RemappingTransform> for IndexTransform {
    fn from(t: RemappingTransform) -> Self {
        IndexTransform::Remapping(t)
    }
}
