//! Storage facade
//!
//! Holds one `RowStore` and one `ColumnStore` under a single handle and
//! exposes both layouts' operations, prefixed by layout (`row_*`,
//! `column_*`). Column queries on indexed string fields use the hash index
//! automatically.
//!
//! The two layouts are not synchronized. `append` writes both; `append_row`
//! and `append_column` write one. Keeping them describing the same data is
//! up to the caller.

use crate::column::{ColumnStore, ColumnStoreOptions};
use crate::errors::StoreResult;
use crate::field::{ColumnField, Field, NumericField};
use crate::observability::SharedObserver;
use crate::record::{Record, RowId};
use crate::row::RowStore;

/// A row store and a column store under one handle
#[derive(Debug, Clone, Default)]
pub struct Storage {
    rows: RowStore,
    columns: ColumnStore,
}

impl Storage {
    /// Empty storage with an interned, indexed column store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ColumnStoreOptions) -> Self {
        Self {
            rows: RowStore::new(),
            columns: ColumnStore::with_options(options),
        }
    }

    pub fn with_capacity(options: ColumnStoreOptions, capacity: usize) -> Self {
        Self {
            rows: RowStore::with_capacity(capacity),
            columns: ColumnStore::with_capacity(options, capacity),
        }
    }

    /// Sends both layouts' reports to `observer`
    pub fn with_observer(self, observer: SharedObserver) -> Self {
        Self {
            rows: self.rows.with_observer(observer.clone()),
            columns: self.columns.with_observer(observer),
        }
    }

    /// Storage whose row layout is `rows`; the column layout starts empty
    pub fn from_rows(rows: RowStore) -> Self {
        let columns = ColumnStore::new().with_observer(rows.observer().clone());
        Self { rows, columns }
    }

    /// Storage whose column layout is `columns`; the row layout starts empty
    pub fn from_columns(columns: ColumnStore) -> Self {
        let rows = RowStore::new().with_observer(columns.observer().clone());
        Self { rows, columns }
    }

    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnStore {
        &self.columns
    }

    pub fn into_parts(self) -> (RowStore, ColumnStore) {
        (self.rows, self.columns)
    }

    /// Appends `record` to both layouts.
    ///
    /// Row capacity is reserved first and the column append is atomic, so a
    /// failure leaves both layouts as they were.
    pub fn append(&mut self, record: Record) -> StoreResult<RowId> {
        self.rows.reserve(1)?;
        let row = self.columns.append(&record)?;
        self.rows.append(record)?;
        Ok(row)
    }

    /// Appends to the row layout only
    pub fn append_row(&mut self, record: Record) -> StoreResult<RowId> {
        self.rows.append(record)
    }

    /// Appends to the column layout only
    pub fn append_column(&mut self, record: &Record) -> StoreResult<RowId> {
        self.columns.append(record)
    }

    pub fn row_count(&self) -> usize {
        self.rows.count()
    }

    pub fn column_count(&self) -> usize {
        self.columns.count()
    }

    pub fn row_count_equals<F: Field>(&self, value: &F::Value) -> usize {
        self.rows.count_equals::<F>(value)
    }

    pub fn column_count_equals<F: ColumnField>(&self, value: &F::Value) -> usize {
        self.columns.count_equals::<F>(value)
    }

    /// Filters the row layout into a new storage with an empty column layout
    pub fn row_filter_equals<F: Field>(&self, value: &F::Value) -> Storage {
        Storage::from_rows(self.rows.filter_equals::<F>(value))
    }

    /// Filters the column layout into a new storage with an empty row layout
    pub fn column_filter_equals<F: ColumnField>(&self, value: &F::Value) -> Storage {
        Storage::from_columns(self.columns.filter_equals::<F>(value))
    }

    pub fn row_max<F: NumericField>(&self) -> F::Num {
        self.rows.max::<F>()
    }

    pub fn row_min<F: NumericField>(&self) -> F::Num {
        self.rows.min::<F>()
    }

    pub fn row_sum<F: NumericField>(&self) -> F::Num {
        self.rows.sum::<F>()
    }

    pub fn column_max<F: NumericField>(&self) -> F::Num {
        self.columns.max::<F>()
    }

    pub fn column_min<F: NumericField>(&self) -> F::Num {
        self.columns.min::<F>()
    }

    pub fn column_sum<F: NumericField>(&self) -> F::Num {
        self.columns.sum::<F>()
    }

    /// Checks the column layout's structural invariants
    pub fn verify(&self) -> StoreResult<()> {
        self.columns.verify()
    }
}
