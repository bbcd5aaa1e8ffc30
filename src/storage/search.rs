//! Search primitives shared by every storage kind
//!
//! Storages describe a row through a comparison closure; these helpers turn
//! that into either a binary-searched sub-range or a linear scan. Indexed
//! searches return offsets into the searched position list, never row values,
//! so callers that passed duplicate rows can still tell the hits apart.

use std::cmp::Ordering;
use std::ops::Range;

use crate::index_set::IndexSet;
use crate::query::ComparisonOp;

/// How a storage resolved a predicate before touching any row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resolution<K> {
    /// Nothing can match (type mismatch, null operand, null check on non-null data)
    Empty,
    /// Every row matches (IsNotNull on never-null data)
    All,
    /// Compare each row against `K` with the operator
    Compare(ComparisonOp, K),
}

/// Smallest row in `range` for which `pred` is false, assuming `pred` is
/// true for a prefix of the range and false afterwards.
pub(crate) fn partition_point(range: Range<u32>, mut pred: impl FnMut(u32) -> bool) -> u32 {
    let (mut lo, mut hi) = (range.start, range.end.max(range.start));
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Binary search over rows whose values are non-decreasing, nulls first.
///
/// `cmp(row)` orders the row's value against the operand; `None` marks a null.
pub(crate) fn sorted_range(
    range: Range<u32>,
    op: ComparisonOp,
    cmp: impl Fn(u32) -> Option<Ordering>,
) -> IndexSet {
    debug_assert!(op.supports_binary_search());
    let end = range.end;
    let first_value = partition_point(range.clone(), |row| cmp(row).is_none());
    let lower = partition_point(first_value..end, |row| cmp(row) == Some(Ordering::Less));
    let upper = partition_point(lower..end, |row| cmp(row) != Some(Ordering::Greater));

    match op {
        ComparisonOp::Equal => IndexSet::range(lower, upper),
        ComparisonOp::Less => IndexSet::range(first_value, lower),
        ComparisonOp::LessOrEqual => IndexSet::range(first_value, upper),
        ComparisonOp::Greater => IndexSet::range(upper, end),
        ComparisonOp::GreaterOrEqual => IndexSet::range(lower, end),
        _ => IndexSet::empty(),
    }
}

/// Linear scan over `range`, keeping rows where `matches` holds.
pub(crate) fn scan_range(range: Range<u32>, mut matches: impl FnMut(u32) -> bool) -> IndexSet {
    IndexSet::from_indices(range.filter(|&row| matches(row)).collect())
}

/// Offsets into `positions` whose rows satisfy `matches`.
pub(crate) fn scan_positions(positions: &[u32], mut matches: impl FnMut(u32) -> bool) -> Vec<u32> {
    positions
        .iter()
        .enumerate()
        .filter(|(_, &row)| matches(row))
        .map(|(offset, _)| offset as u32)
        .collect()
}

/// Every offset of a searched list.
pub(crate) fn all_offsets(len: usize) -> Vec<u32> {
    (0..len as u32).collect()
}

/// Evaluates an already-resolved comparison over a contiguous range.
pub(crate) fn bounded_compare<K: Copy>(
    resolution: Resolution<K>,
    range: Range<u32>,
    sorted: bool,
    cmp: impl Fn(u32, K) -> Option<Ordering>,
) -> IndexSet {
    match resolution {
        Resolution::Empty => IndexSet::empty(),
        Resolution::All => IndexSet::from(range),
        Resolution::Compare(op, key) if sorted && op.supports_binary_search() => {
            sorted_range(range, op, |row| cmp(row, key))
        }
        Resolution::Compare(op, key) => {
            scan_range(range, |row| cmp(row, key).map_or(false, |ord| op.accepts(ord)))
        }
    }
}

/// Evaluates an already-resolved comparison over explicit positions.
pub(crate) fn indexed_compare<K: Copy>(
    resolution: Resolution<K>,
    positions: &[u32],
    cmp: impl Fn(u32, K) -> Option<Ordering>,
) -> Vec<u32> {
    match resolution {
        Resolution::Empty => Vec::new(),
        Resolution::All => all_offsets(positions.len()),
        Resolution::Compare(op, key) => scan_positions(positions, |row| {
            cmp(row, key).map_or(false, |ord| op.accepts(ord))
        }),
    }
}
