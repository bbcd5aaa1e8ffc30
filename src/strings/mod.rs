//! String interning collaborator
//!
//! Interned string columns store `StringId`s and resolve text through an
//! injected `StringLookup`. The pool is shared read-only state owned by the
//! caller; this crate never mutates it during a query.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of an interned string. Id 0 is reserved for null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StringId(u32);

impl StringId {
    /// The null string.
    pub const NULL: StringId = StringId(0);

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn from_raw(raw: u32) -> Self {
        StringId(raw)
    }

    /// Returns true for the reserved null id.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "NULL")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Read-only id to text lookup.
pub trait StringLookup: Send + Sync {
    /// Returns the text for `id`, or `None` for the null id.
    fn lookup(&self, id: StringId) -> Option<&str>;
}

/// A simple append-only interner.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: Vec<Arc<str>>,
    ids: HashMap<Arc<str>, StringId>,
}

impl StringPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning the existing id if it was seen before.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(id) = self.ids.get(s) {
            return *id;
        }
        let text: Arc<str> = Arc::from(s);
        self.strings.push(text.clone());
        let id = StringId(self.strings.len() as u32);
        self.ids.insert(text, id);
        id
    }

    /// Returns the id of `s` without interning it.
    pub fn id_of(&self, s: &str) -> Option<StringId> {
        self.ids.get(s).copied()
    }

    /// Number of distinct strings interned.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl StringLookup for StringPool {
    fn lookup(&self, id: StringId) -> Option<&str> {
        if id.is_null() {
            return None;
        }
        self.strings.get(id.0 as usize - 1).map(|s| s.as_ref())
    }
}
