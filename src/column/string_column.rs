//! String column storage
//!
//! A string column is either plain (an owned `String` per row) or interned
//! (a `StringId` per row resolved through the store's `StringTable`).

use std::collections::TryReserveError;

use super::intern::{StringId, StringTable};
use crate::record::RowId;

#[derive(Debug, Clone)]
pub enum StringColumn {
    Plain(Vec<String>),
    Interned(Vec<StringId>),
}

impl StringColumn {
    pub fn new(interned: bool, capacity: usize) -> Self {
        if interned {
            StringColumn::Interned(Vec::with_capacity(capacity))
        } else {
            StringColumn::Plain(Vec::with_capacity(capacity))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StringColumn::Plain(values) => values.len(),
            StringColumn::Interned(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_interned(&self) -> bool {
        matches!(self, StringColumn::Interned(_))
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        match self {
            StringColumn::Plain(values) => values.try_reserve(additional),
            StringColumn::Interned(ids) => ids.try_reserve(additional),
        }
    }

    /// Appends `value`, interning it when the column is interned.
    ///
    /// Returns the id stored for interned columns.
    pub fn push(&mut self, value: &str, table: &mut StringTable) -> Option<StringId> {
        match self {
            StringColumn::Plain(values) => {
                values.push(value.to_string());
                None
            }
            StringColumn::Interned(ids) => {
                let id = table.intern(value);
                ids.push(id);
                Some(id)
            }
        }
    }

    /// Value at `row`; `None` past the end or for an unresolvable id
    pub fn get<'a>(&'a self, row: RowId, table: &'a StringTable) -> Option<&'a str> {
        match self {
            StringColumn::Plain(values) => values.get(row as usize).map(String::as_str),
            StringColumn::Interned(ids) => ids.get(row as usize).and_then(|id| table.resolve(*id)),
        }
    }

    /// Interned id at `row`, for interned columns
    pub fn id(&self, row: RowId) -> Option<StringId> {
        match self {
            StringColumn::Plain(_) => None,
            StringColumn::Interned(ids) => ids.get(row as usize).copied(),
        }
    }

    /// Every position holding `value`, ascending, by scanning the column
    pub fn positions_of(&self, value: &str, table: &StringTable) -> Vec<RowId> {
        match self {
            StringColumn::Plain(values) => matching_positions(values.iter().map(|v| v == value)),
            StringColumn::Interned(ids) => match table.get(value) {
                Some(target) => matching_positions(ids.iter().map(|id| *id == target)),
                None => Vec::new(),
            },
        }
    }

    /// Number of positions holding `value`, by scanning the column
    pub fn count_of(&self, value: &str, table: &StringTable) -> usize {
        match self {
            StringColumn::Plain(values) => values.iter().filter(|v| *v == value).count(),
            StringColumn::Interned(ids) => match table.get(value) {
                Some(target) => ids.iter().filter(|id| **id == target).count(),
                None => 0,
            },
        }
    }
}

/// Positions where `matches` yields true, ascending
pub(crate) fn matching_positions(matches: impl Iterator<Item = bool>) -> Vec<RowId> {
    matches
        .enumerate()
        .filter(|(_, hit)| *hit)
        .map(|(i, _)| i as RowId)
        .collect()
}
