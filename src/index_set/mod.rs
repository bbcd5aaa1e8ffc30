//! Row position sets produced by every filtering step
//!
//! An `IndexSet` is either a half-open contiguous range or an explicit,
//! order-preserving list of positions. The representation is an
//! optimization only: two sets with the same materialized contents are equal.
//!
//! # Invariants
//!
//! - Never mutated after construction; each narrowing step returns a new set
//! - Narrowing preserves the relative order of surviving positions

use std::ops::Range;

/// A set of row positions.
#[derive(Debug, Clone)]
pub enum IndexSet {
    /// Contiguous positions `[start, end)`
    Range { start: u32, end: u32 },
    /// Explicit positions in order
    Indices(Vec<u32>),
}

impl IndexSet {
    /// Creates the range `[start, end)`. An inverted range is empty.
    pub fn range(start: u32, end: u32) -> Self {
        IndexSet::Range {
            start,
            end: end.max(start),
        }
    }

    /// Creates an empty set.
    pub fn empty() -> Self {
        IndexSet::Range { start: 0, end: 0 }
    }

    /// Wraps an explicit list of positions, kept in the given order.
    pub fn from_indices(indices: Vec<u32>) -> Self {
        IndexSet::Indices(indices)
    }

    /// Number of positions in the set.
    pub fn size(&self) -> u32 {
        match self {
            IndexSet::Range { start, end } => end - start,
            IndexSet::Indices(v) => v.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns true if this set is held as a contiguous range.
    pub fn is_range(&self) -> bool {
        matches!(self, IndexSet::Range { .. })
    }

    /// The bounds, if held as a range.
    pub fn as_range(&self) -> Option<Range<u32>> {
        match self {
            IndexSet::Range { start, end } => Some(*start..*end),
            IndexSet::Indices(_) => None,
        }
    }

    /// Returns the `i`-th position.
    pub fn get(&self, i: u32) -> u32 {
        assert!(i < self.size(), "IndexSet position {} out of bounds ({})", i, self.size());
        match self {
            IndexSet::Range { start, .. } => start + i,
            IndexSet::Indices(v) => v[i as usize],
        }
    }

    /// O(1) for ranges, linear for lists.
    pub fn contains(&self, row: u32) -> bool {
        match self {
            IndexSet::Range { start, end } => (*start..*end).contains(&row),
            IndexSet::Indices(v) => v.contains(&row),
        }
    }

    /// Positions in ascending order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            IndexSet::Range { start, end } => Box::new(*start..*end),
            IndexSet::Indices(v) => Box::new(v.iter().copied()),
        }
    }

    /// Materializes the positions into a list.
    pub fn materialize(&self) -> Vec<u32> {
        match self {
            IndexSet::Range { start, end } => (*start..*end).collect(),
            IndexSet::Indices(v) => v.clone(),
        }
    }

    /// Consumes the set, materializing only if it is a range.
    pub fn into_indices(self) -> Vec<u32> {
        match self {
            IndexSet::Range { start, end } => (start..end).collect(),
            IndexSet::Indices(v) => v,
        }
    }

}

impl Default for IndexSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Range<u32>> for IndexSet {
    fn from(r: Range<u32>) -> Self {
        IndexSet::range(r.start, r.end)
    }
}

impl From<Vec<u32>> for IndexSet {
    fn from(v: Vec<u32>) -> Self {
        IndexSet::Indices(v)
    }
}

impl PartialEq for IndexSet {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IndexSet::Range { .. }, IndexSet::Range { .. }) if self.is_empty() => {
                other.is_empty()
            }
            (
                IndexSet::Range { start: a, end: b },
                IndexSet::Range { start: c, end: d },
            ) => a == c && b == d,
            (IndexSet::Indices(a), IndexSet::Indices(b)) => a == b,
            _ => self.size() == other.size() && self.iter().eq(other.iter()),
        }
    }
}

impl Eq for IndexSet {}
