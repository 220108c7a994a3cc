//! String interning
//!
//! Each distinct string is stored once. Columns hold `StringId`s, which are
//! positions in the table's arena. The table is append-only, so an id handed
//! out by `intern` stays valid for the life of the table.

use std::collections::{HashMap, TryReserveError};
use std::fmt;
use std::sync::Arc;

/// Handle to a canonical string in a `StringTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringId(u32);

impl StringId {
    /// Position of the string in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena of canonical strings with a reverse lookup map
///
/// The arena and the map share one allocation per string.
#[derive(Debug, Default, Clone)]
pub struct StringTable {
    strings: Vec<Arc<str>>,
    ids: HashMap<Arc<str>, StringId>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `value` if it has been interned
    pub fn get(&self, value: &str) -> Option<StringId> {
        self.ids.get(value).copied()
    }

    /// Canonical string for `id`
    pub fn resolve(&self, id: StringId) -> Option<&str> {
        self.strings.get(id.index()).map(|s| s.as_ref())
    }

    /// Returns the id of `value`, inserting it on first sight
    pub fn intern(&mut self, value: &str) -> StringId {
        if let Some(id) = self.get(value) {
            return id;
        }

        // Distinct strings never outnumber rows, and rows are capped at u32.
        let id = StringId(self.strings.len() as u32);
        let canonical: Arc<str> = Arc::from(value);
        self.strings.push(Arc::clone(&canonical));
        self.ids.insert(canonical, id);
        id
    }

    /// Reserves room for `additional` new strings without inserting any
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.strings.try_reserve(additional)?;
        self.ids.try_reserve(additional)
    }

    /// Number of distinct strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterates `(id, string)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (StringId, &str)> + '_ {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (StringId(i as u32), s.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut table = StringTable::new();
        let a = table.intern("AAA");
        let b = table.intern("BBB");
        let a2 = table.intern("AAA");

        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_resolve_returns_canonical() {
        let mut table = StringTable::new();
        let id = table.intern("2020-01-01");
        assert_eq!(table.resolve(id), Some("2020-01-01"));
        assert_eq!(table.get("2020-01-01"), Some(id));
    }

    #[test]
    fn test_absent_value() {
        let mut table = StringTable::new();
        table.intern("AAA");
        assert_eq!(table.get("ZZZ"), None);
        assert_eq!(table.resolve(StringId(9)), None);
    }

    #[test]
    fn test_ids_are_dense_in_insertion_order() {
        let mut table = StringTable::new();
        for s in ["c", "a", "b", "a", "c"] {
            table.intern(s);
        }
        let pairs: Vec<_> = table.iter().map(|(id, s)| (id.index(), s.to_string())).collect();
        assert_eq!(
            pairs,
            vec![(0, "c".to_string()), (1, "a".to_string()), (2, "b".to_string())]
        );
    }

    #[test]
    fn test_reserve_does_not_insert() {
        let mut table = StringTable::new();
        table.try_reserve(4).unwrap();
        assert!(table.is_empty());
    }
}
