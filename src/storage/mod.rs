//! Column storage: the base representation of a column's values
//!
//! Every storage kind answers two questions:
//! - `bounded_filter`: which rows of a contiguous range match
//! - `indexed_search`: which entries of an explicit position list match
//!
//! # Invariants
//!
//! - Binary search is used only for Equal/Less/LessOrEqual/Greater/GreaterOrEqual
//!   on storage known to be sorted; patterns always scan
//! - Type mismatches and null operands yield empty results, never errors
//! - Identity, group-run and numeric storage are never null

mod group_run;
mod identity;
mod numeric;
pub(crate) mod search;
mod string;

pub use group_run::GroupRunStorage;
pub use identity::IdentityStorage;
pub use numeric::{NumericStorage, NumericValue};
pub use string::InternedStringStorage;

use std::ops::Range;

use crate::index_set::IndexSet;
use crate::query::Predicate;

/// One base storage, dispatched once per filter call.
#[derive(Debug, Clone)]
pub enum ColumnStorage {
    Identity(IdentityStorage),
    GroupRun(GroupRunStorage),
    Uint32(NumericStorage<u32>),
    Int32(NumericStorage<i32>),
    Int64(NumericStorage<i64>),
    Double(NumericStorage<f64>),
    String(InternedStringStorage),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            ColumnStorage::Identity($s) => $body,
            ColumnStorage::GroupRun($s) => $body,
            ColumnStorage::Uint32($s) => $body,
            ColumnStorage::Int32($s) => $body,
            ColumnStorage::Int64($s) => $body,
            ColumnStorage::Double($s) => $body,
            ColumnStorage::String($s) => $body,
        }
    };
}

impl ColumnStorage {
    /// Number of rows held.
    pub fn size(&self) -> u32 {
        dispatch!(self, s => s.size())
    }

    /// Storage kind written in FILTER_STEP log lines
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnStorage::Identity(_) => "identity",
            ColumnStorage::GroupRun(_) => "group_run",
            ColumnStorage::Uint32(_) => "uint32",
            ColumnStorage::Int32(_) => "int32",
            ColumnStorage::Int64(_) => "int64",
            ColumnStorage::Double(_) => "double",
            ColumnStorage::String(_) => "string",
        }
    }

    /// Whether a binary search is possible for ordered comparisons.
    pub fn is_sorted(&self) -> bool {
        match self {
            ColumnStorage::Identity(_) | ColumnStorage::GroupRun(_) => true,
            ColumnStorage::Uint32(s) => s.is_sorted(),
            ColumnStorage::Int32(s) => s.is_sorted(),
            ColumnStorage::Int64(s) => s.is_sorted(),
            ColumnStorage::Double(s) => s.is_sorted(),
            ColumnStorage::String(s) => s.is_sorted(),
        }
    }

    /// Whether any row can be null.
    pub fn can_contain_nulls(&self) -> bool {
        match self {
            ColumnStorage::String(s) => s.has_nulls(),
            _ => false,
        }
    }

    pub fn bounded_filter(&self, predicate: &Predicate, range: Range<u32>) -> IndexSet {
        debug_assert!(range.end <= self.size(), "range exceeds storage");
        dispatch!(self, s => s.bounded_filter(predicate, range))
    }

    /// Returns offsets into `positions` whose rows match, in input order.
    pub fn indexed_search(&self, predicate: &Predicate, positions: &[u32]) -> Vec<u32> {
        dispatch!(self, s => s.indexed_search(predicate, positions))
    }
}

impl From<IdentityStorage> for ColumnStorage {
    fn from(s: IdentityStorage) -> Self {
        ColumnStorage::Identity(s)
    }
}

impl From<GroupRunStorage> for ColumnStorage {
    fn from(s: GroupRunStorage) -> Self {
        ColumnStorage::GroupRun(s)
    }
}

impl From<NumericStorage<u32>> for ColumnStorage {
    fn from(s: NumericStorage<u32>) -> Self {
        ColumnStorage::Uint32(s)
    }
}

impl From<NumericStorage<i32>> for ColumnStorage {
    fn from(s: NumericStorage<i32>) -> Self {
        ColumnStorage::Int32(s)
    }
}

impl From<NumericStorage<i64>> for ColumnStorage {
    fn from(s: NumericStorage<i64>) -> Self {
        ColumnStorage::Int64(s)
    }
}

impl From<NumericStorage<f64>> for ColumnStorage {
    fn from(s: NumericStorage<f64>) -> Self {
        ColumnStorage::Double(s)
    }
}

impl From<InternedStringStorage> for ColumnStorage {
    fn from(s: InternedStringStorage) -> Self {
        ColumnStorage::String(s)
    }
}
