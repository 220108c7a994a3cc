//! Hash index over an interned string column
//!
//! Maps each `StringId` to the row positions holding it. Rows are only ever
//! appended, so every bucket is ascending without sorting.

use std::collections::{HashMap, TryReserveError};

use super::intern::StringId;
use crate::record::RowId;

/// Capacity set aside by `HashIndex::reserve` for one upcoming insert
#[derive(Debug)]
pub struct Reservation {
    fresh: Option<Vec<RowId>>,
}

/// A single string column index
#[derive(Debug, Default, Clone)]
pub struct HashIndex {
    buckets: HashMap<StringId, Vec<RowId>>,
}

impl HashIndex {
    /// Creates a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves room to add one position under `key`.
    ///
    /// `key` is `None` when the string has not been interned yet, in which
    /// case a fresh bucket is allocated up front.
    pub fn reserve(&mut self, key: Option<StringId>) -> Result<Reservation, TryReserveError> {
        if let Some(bucket) = key.and_then(|k| self.buckets.get_mut(&k)) {
            bucket.try_reserve(1)?;
            return Ok(Reservation { fresh: None });
        }

        self.buckets.try_reserve(1)?;
        let mut fresh = Vec::new();
        fresh.try_reserve(1)?;
        Ok(Reservation { fresh: Some(fresh) })
    }

    /// Appends `row` to the bucket for `key` using reserved capacity
    pub fn push_reserved(&mut self, key: StringId, row: RowId, reservation: Reservation) {
        let bucket = self
            .buckets
            .entry(key)
            .or_insert_with(|| reservation.fresh.unwrap_or_default());
        debug_assert!(bucket.last().map_or(true, |&last| last < row));
        bucket.push(row);
    }

    /// Appends `row` to the bucket for `key`
    pub fn push(&mut self, key: StringId, row: RowId) {
        let bucket = self.buckets.entry(key).or_default();
        debug_assert!(bucket.last().map_or(true, |&last| last < row));
        bucket.push(row);
    }

    /// Positions holding `key`, ascending. Empty when the key is absent.
    pub fn lookup(&self, key: StringId) -> &[RowId] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total positions across all buckets
    pub fn positions(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Iterates buckets in unspecified key order
    pub fn iter(&self) -> impl Iterator<Item = (StringId, &[RowId])> + '_ {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}
