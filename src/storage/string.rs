//! Interned string storage
//!
//! Rows hold `StringId`s resolved through an injected `StringLookup`. The
//! null id marks a null row. When flagged sorted, nulls come first and the
//! remaining text is lexicographically non-decreasing. A pattern that fails
//! to compile matches nothing.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::search::{bounded_compare, indexed_compare, scan_positions, scan_range, Resolution};
use crate::index_set::IndexSet;
use crate::query::{ComparisonOp, Pattern, Predicate};
use crate::strings::{StringId, StringLookup};

#[derive(Clone)]
pub struct InternedStringStorage {
    pool: Arc<dyn StringLookup>,
    ids: Arc<[StringId]>,
    sorted: bool,
    has_nulls: bool,
}

/// How a string predicate is evaluated row by row.
enum StringMatch<'a> {
    Resolved(Resolution<&'a str>),
    Null(bool),
    Pattern(Pattern),
}

impl InternedStringStorage {
    /// Creates unsorted storage; `ids` are resolved through `pool`.
    pub fn new(pool: Arc<dyn StringLookup>, ids: impl Into<Arc<[StringId]>>) -> Self {
        let ids: Arc<[StringId]> = ids.into();
        let has_nulls = ids.iter().any(|id| id.is_null());
        Self {
            pool,
            ids,
            sorted: false,
            has_nulls,
        }
    }

    /// Creates storage whose text is sorted (nulls first), enabling binary search.
    pub fn new_sorted(pool: Arc<dyn StringLookup>, ids: impl Into<Arc<[StringId]>>) -> Self {
        let storage = Self {
            sorted: true,
            ..Self::new(pool, ids)
        };
        debug_assert!(
            storage
                .ids
                .windows(2)
                .all(|w| storage.text(w[0]) <= storage.text(w[1])),
            "sorted string storage must be non-decreasing"
        );
        storage
    }

    /// Number of rows.
    pub fn size(&self) -> u32 {
        self.ids.len() as u32
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn ids(&self) -> &[StringId] {
        &self.ids
    }

    /// Whether any row is null.
    pub fn has_nulls(&self) -> bool {
        self.has_nulls
    }

    fn text(&self, id: StringId) -> Option<&str> {
        self.pool.lookup(id)
    }

    fn row_text(&self, row: u32) -> Option<&str> {
        self.text(self.ids[row as usize])
    }

    fn is_null_row(&self, row: u32) -> bool {
        self.ids[row as usize].is_null()
    }

    fn resolve<'p>(&self, predicate: &'p Predicate) -> StringMatch<'p> {
        match predicate.op {
            ComparisonOp::IsNull => StringMatch::Null(true),
            ComparisonOp::IsNotNull => StringMatch::Null(false),
            op if op.is_pattern() => {
                let Some(text) = predicate.operand.as_text() else {
                    return StringMatch::Resolved(Resolution::Empty);
                };
                match Pattern::compile(op, text) {
                    Some(Ok(pattern)) => StringMatch::Pattern(pattern),
                    Some(Err(_)) => StringMatch::Resolved(Resolution::Empty),
                    None => StringMatch::Resolved(Resolution::Empty),
                }
            }
            op => match predicate.operand.as_text() {
                Some(text) => StringMatch::Resolved(Resolution::Compare(op, text)),
                None => StringMatch::Resolved(Resolution::Empty),
            },
        }
    }

    /// Rows of `range` matching `predicate`. Patterns always scan.
    pub fn bounded_filter(&self, predicate: &Predicate, range: Range<u32>) -> IndexSet {
        match self.resolve(predicate) {
            StringMatch::Null(want_null) => scan_range(range, |row| self.is_null_row(row) == want_null),
            StringMatch::Pattern(pattern) => scan_range(range, |row| {
                self.row_text(row).map_or(false, |s| pattern.is_match(s))
            }),
            StringMatch::Resolved(resolution) => {
                bounded_compare(resolution, range, self.sorted, |row, text| {
                    self.row_text(row).map(|s| s.cmp(text))
                })
            }
        }
    }

    /// Returns offsets into `positions` whose rows match.
    pub fn indexed_search(&self, predicate: &Predicate, positions: &[u32]) -> Vec<u32> {
        match self.resolve(predicate) {
            StringMatch::Null(want_null) => {
                scan_positions(positions, |row| self.is_null_row(row) == want_null)
            }
            StringMatch::Pattern(pattern) => scan_positions(positions, |row| {
                self.row_text(row).map_or(false, |s| pattern.is_match(s))
            }),
            StringMatch::Resolved(resolution) => indexed_compare(resolution, positions, |row, text| {
                self.row_text(row).map(|s| s.cmp(text))
            }),
        }
    }
}

impl fmt::Debug for InternedStringStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternedStringStorage")
            .field("len", &self.ids.len())
            .field("sorted", &self.sorted)
            .finish()
    }
}
