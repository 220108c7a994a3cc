//! Column-oriented store
//!
//! One vector per field, all the same length. Position `i` of every column
//! together forms logical row `i`.
//!
//! # Invariants
//!
//! - Every column holds exactly `count()` entries
//! - Every interned id resolves in the store's `StringTable`
//! - Each hash index bucket lists, ascending, exactly the rows holding its key
//!
//! `append` is the only mutation path and keeps all three by construction.
//! `verify()` re-checks them.

use std::fmt;

use super::hash_index::{HashIndex, Reservation};
use super::intern::StringTable;
use super::options::ColumnStoreOptions;
use super::string_column::StringColumn;
use crate::errors::{StoreError, StoreResult};
use crate::field::{max_of, min_of, sum_of, ColumnField, FieldId, Lookup, Numeric, NumericField};
use crate::observability::{
    self, AccessPath, Layout, Operation, OperationReport, Outcome, SharedObserver, Timer,
};
use crate::record::{Record, RowId};

/// Borrowed view of one reconstructed row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowView<'a> {
    pub symbol: &'a str,
    pub date: &'a str,
    pub high: f32,
    pub low: f32,
    pub open: f32,
    pub close: f32,
    pub close_adjusted: f32,
    pub volume: u32,
    pub split_coefficient: f32,
}

impl<'a> RowView<'a> {
    pub fn from_record(record: &'a Record) -> Self {
        Self {
            symbol: &record.symbol,
            date: &record.date,
            high: record.high,
            low: record.low,
            open: record.open,
            close: record.close,
            close_adjusted: record.close_adjusted,
            volume: record.volume,
            split_coefficient: record.split_coefficient,
        }
    }

    pub fn to_record(&self) -> Record {
        Record::new(
            self.symbol,
            self.date,
            self.high,
            self.low,
            self.open,
            self.close,
            self.close_adjusted,
            self.volume,
            self.split_coefficient,
        )
    }
}

/// Index capacity reserved for one append
#[derive(Debug, Default)]
struct Slots {
    symbol: Option<Reservation>,
    date: Option<Reservation>,
}

/// Column-oriented market data store
#[derive(Clone)]
pub struct ColumnStore {
    options: ColumnStoreOptions,
    rows: usize,

    strings: StringTable,
    symbol: StringColumn,
    date: StringColumn,

    high: Vec<f32>,
    low: Vec<f32>,
    open: Vec<f32>,
    close: Vec<f32>,
    close_adjusted: Vec<f32>,
    volume: Vec<u32>,
    split_coefficient: Vec<f32>,

    symbol_index: Option<HashIndex>,
    date_index: Option<HashIndex>,

    observer: SharedObserver,
}

impl ColumnStore {
    /// Empty store with interned strings and both string columns indexed
    pub fn new() -> Self {
        Self::with_options(ColumnStoreOptions::default())
    }

    pub fn with_options(options: ColumnStoreOptions) -> Self {
        Self::with_capacity(options, 0)
    }

    pub fn with_capacity(options: ColumnStoreOptions, capacity: usize) -> Self {
        Self {
            options,
            rows: 0,
            strings: StringTable::new(),
            symbol: StringColumn::new(options.intern_strings, capacity),
            date: StringColumn::new(options.intern_strings, capacity),
            high: Vec::with_capacity(capacity),
            low: Vec::with_capacity(capacity),
            open: Vec::with_capacity(capacity),
            close: Vec::with_capacity(capacity),
            close_adjusted: Vec::with_capacity(capacity),
            volume: Vec::with_capacity(capacity),
            split_coefficient: Vec::with_capacity(capacity),
            symbol_index: options.symbol_indexed().then(HashIndex::new),
            date_index: options.date_indexed().then(HashIndex::new),
            observer: observability::noop(),
        }
    }

    /// Replaces the observer that receives operation reports
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Builds a store by appending `records` in order
    pub fn from_records<'a>(
        options: ColumnStoreOptions,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> StoreResult<Self> {
        let mut store = Self::with_options(options);
        for record in records {
            store.append(record)?;
        }
        Ok(store)
    }

    pub fn options(&self) -> ColumnStoreOptions {
        self.options
    }

    pub fn observer(&self) -> &SharedObserver {
        &self.observer
    }

    /// Number of rows
    pub fn count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Distinct interned strings across the symbol and date columns
    pub fn distinct_strings(&self) -> usize {
        self.strings.len()
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn symbol_column(&self) -> &StringColumn {
        &self.symbol
    }

    pub fn date_column(&self) -> &StringColumn {
        &self.date
    }

    pub fn symbol_index(&self) -> Option<&HashIndex> {
        self.symbol_index.as_ref()
    }

    pub fn date_index(&self) -> Option<&HashIndex> {
        self.date_index.as_ref()
    }

    pub fn high_column(&self) -> &[f32] {
        &self.high
    }

    pub fn low_column(&self) -> &[f32] {
        &self.low
    }

    pub fn open_column(&self) -> &[f32] {
        &self.open
    }

    pub fn close_column(&self) -> &[f32] {
        &self.close
    }

    pub fn close_adjusted_column(&self) -> &[f32] {
        &self.close_adjusted
    }

    pub fn volume_column(&self) -> &[u32] {
        &self.volume
    }

    pub fn split_coefficient_column(&self) -> &[f32] {
        &self.split_coefficient
    }

    /// Appends one row across every column, the string table and the indexes.
    ///
    /// Capacity for every structure is reserved before anything is written,
    /// so on error the store is unchanged.
    pub fn append(&mut self, record: &Record) -> StoreResult<RowId> {
        self.append_view(RowView::from_record(record))
    }

    /// Appends the nine positional ingestion values
    #[allow(clippy::too_many_arguments)]
    pub fn append_values(
        &mut self,
        symbol: &str,
        date: &str,
        high: f32,
        low: f32,
        open: f32,
        close: f32,
        close_adjusted: f32,
        volume: u32,
        split_coefficient: f32,
    ) -> StoreResult<RowId> {
        self.append_view(RowView {
            symbol,
            date,
            high,
            low,
            open,
            close,
            close_adjusted,
            volume,
            split_coefficient,
        })
    }

    fn append_view(&mut self, view: RowView<'_>) -> StoreResult<RowId> {
        let timer = Timer::new();
        let row = RowId::try_from(self.rows).map_err(|_| StoreError::row_limit(self.rows))?;

        let slots = self.reserve_row(view.symbol, view.date)?;
        self.push_row(view, slots);

        self.observer.observe(&OperationReport::append(
            Layout::Column,
            timer.elapsed_micros(),
            self.rows,
        ));
        Ok(row)
    }

    fn reserve_row(&mut self, symbol: &str, date: &str) -> StoreResult<Slots> {
        let exhausted = |what: &'static str| move |e| StoreError::capacity_exhausted(what, e);

        self.symbol.try_reserve(1).map_err(exhausted("symbol column"))?;
        self.date.try_reserve(1).map_err(exhausted("date column"))?;
        self.high.try_reserve(1).map_err(exhausted("high column"))?;
        self.low.try_reserve(1).map_err(exhausted("low column"))?;
        self.open.try_reserve(1).map_err(exhausted("open column"))?;
        self.close.try_reserve(1).map_err(exhausted("close column"))?;
        self.close_adjusted.try_reserve(1).map_err(exhausted("close_adjusted column"))?;
        self.volume.try_reserve(1).map_err(exhausted("volume column"))?;
        self.split_coefficient.try_reserve(1).map_err(exhausted("split_coefficient column"))?;

        if self.options.intern_strings {
            self.strings.try_reserve(2).map_err(exhausted("string table"))?;
        }

        let mut slots = Slots::default();
        if let Some(index) = self.symbol_index.as_mut() {
            let reservation = index.reserve(self.strings.get(symbol));
            slots.symbol = Some(reservation.map_err(exhausted("symbol index"))?);
        }
        if let Some(index) = self.date_index.as_mut() {
            let reservation = index.reserve(self.strings.get(date));
            slots.date = Some(reservation.map_err(exhausted("date index"))?);
        }
        Ok(slots)
    }

    fn push_row(&mut self, view: RowView<'_>, slots: Slots) {
        let row = self.rows as RowId;

        let symbol_id = self.symbol.push(view.symbol, &mut self.strings);
        let date_id = self.date.push(view.date, &mut self.strings);

        self.high.push(view.high);
        self.low.push(view.low);
        self.open.push(view.open);
        self.close.push(view.close);
        self.close_adjusted.push(view.close_adjusted);
        self.volume.push(view.volume);
        self.split_coefficient.push(view.split_coefficient);

        if let (Some(index), Some(id)) = (self.symbol_index.as_mut(), symbol_id) {
            match slots.symbol {
                Some(reservation) => index.push_reserved(id, row, reservation),
                None => index.push(id, row),
            }
        }
        if let (Some(index), Some(id)) = (self.date_index.as_mut(), date_id) {
            match slots.date {
                Some(reservation) => index.push_reserved(id, row, reservation),
                None => index.push(id, row),
            }
        }

        self.rows += 1;
    }

    /// Borrowed view of `row`, read from every column
    pub fn view(&self, row: RowId) -> Option<RowView<'_>> {
        let i = row as usize;
        if i >= self.rows {
            return None;
        }
        Some(RowView {
            symbol: self.symbol.get(row, &self.strings)?,
            date: self.date.get(row, &self.strings)?,
            high: self.high[i],
            low: self.low[i],
            open: self.open[i],
            close: self.close[i],
            close_adjusted: self.close_adjusted[i],
            volume: self.volume[i],
            split_coefficient: self.split_coefficient[i],
        })
    }

    /// Reconstructs the record at `row`
    pub fn row(&self, row: RowId) -> Option<Record> {
        self.view(row).map(|v| v.to_record())
    }

    /// Reconstructs every record in row order
    pub fn rows(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.rows).filter_map(move |i| self.row(i as RowId))
    }

    /// New store holding the rows at `positions`, in the given order.
    ///
    /// Positions past the end are skipped. The new store has the same
    /// options and observer as this one.
    pub fn select(&self, positions: &[RowId]) -> ColumnStore {
        let mut out = ColumnStore::with_capacity(self.options, positions.len())
            .with_observer(self.observer.clone());
        for view in positions.iter().filter_map(|&row| self.view(row)) {
            out.push_row(view, Slots::default());
        }
        out
    }

    /// Matching positions, from the index when the field has one
    pub fn lookup<F: ColumnField>(&self, value: &F::Value) -> Lookup<'_> {
        F::lookup(self, value)
    }

    /// Matching positions found by scanning the column, never the index
    pub fn scan_positions<F: ColumnField>(&self, value: &F::Value) -> Vec<RowId> {
        F::scan(self, value)
    }

    /// Number of rows whose field equals `value`.
    ///
    /// Indexed string fields answer from the index bucket; an absent value
    /// counts zero.
    pub fn count_equals<F: ColumnField>(&self, value: &F::Value) -> usize {
        let timer = Timer::new();
        let (count, path) = F::count(self, value);
        self.report(Operation::CountEquals, F::ID, path, timer, Outcome::Count(count));
        count
    }

    /// New store holding, in order, the rows whose field equals `value`
    pub fn filter_equals<F: ColumnField>(&self, value: &F::Value) -> ColumnStore {
        let timer = Timer::new();
        let lookup = F::lookup(self, value);
        let filtered = self.select(lookup.positions());
        self.report(
            Operation::FilterEquals,
            F::ID,
            lookup.path(),
            timer,
            Outcome::Rows(filtered.count()),
        );
        filtered
    }

    /// Largest value in the column, `LOWEST` when empty
    pub fn max<F: NumericField>(&self) -> F::Num {
        let timer = Timer::new();
        let max = max_of(F::column(self).iter().copied());
        self.report(Operation::Max, F::ID, AccessPath::Scan, timer, Outcome::Scalar(max.to_f64()));
        max
    }

    /// Smallest value in the column, `HIGHEST` when empty
    pub fn min<F: NumericField>(&self) -> F::Num {
        let timer = Timer::new();
        let min = min_of(F::column(self).iter().copied());
        self.report(Operation::Min, F::ID, AccessPath::Scan, timer, Outcome::Scalar(min.to_f64()));
        min
    }

    /// Sum of the column in its own numeric type
    pub fn sum<F: NumericField>(&self) -> F::Num {
        let timer = Timer::new();
        let sum = sum_of(F::column(self).iter().copied());
        self.report(Operation::Sum, F::ID, AccessPath::Scan, timer, Outcome::Scalar(sum.to_f64()));
        sum
    }

    fn report(&self, operation: Operation, field: FieldId, path: AccessPath, timer: Timer, outcome: Outcome) {
        self.observer.observe(&OperationReport::query(
            operation,
            Layout::Column,
            field,
            path,
            timer.elapsed_micros(),
            outcome,
        ));
    }

    fn column_lengths(&self) -> [(FieldId, usize); 9] {
        [
            (FieldId::Symbol, self.symbol.len()),
            (FieldId::Date, self.date.len()),
            (FieldId::High, self.high.len()),
            (FieldId::Low, self.low.len()),
            (FieldId::Open, self.open.len()),
            (FieldId::Close, self.close.len()),
            (FieldId::CloseAdjusted, self.close_adjusted.len()),
            (FieldId::Volume, self.volume.len()),
            (FieldId::SplitCoefficient, self.split_coefficient.len()),
        ]
    }

    /// Checks every structural invariant.
    ///
    /// Any error is FATAL: it means the store was mutated other than through
    /// `append`.
    pub fn verify(&self) -> StoreResult<()> {
        for (field, len) in self.column_lengths() {
            if len != self.rows {
                return Err(StoreError::length_mismatch(field.name(), len, self.rows));
            }
        }

        for (field, column) in [(FieldId::Symbol, &self.symbol), (FieldId::Date, &self.date)] {
            for row in 0..self.rows as RowId {
                if column.get(row, &self.strings).is_none() {
                    return Err(StoreError::dangling_string(field.name(), row));
                }
            }
        }

        let indexes = [
            (FieldId::Symbol, &self.symbol, self.symbol_index.as_ref()),
            (FieldId::Date, &self.date, self.date_index.as_ref()),
        ];
        for (field, column, index) in indexes {
            if let Some(index) = index {
                self.verify_index(field, column, index)?;
            }
        }

        Ok(())
    }

    fn verify_index(&self, field: FieldId, column: &StringColumn, index: &HashIndex) -> StoreResult<()> {
        let name = field.name();
        if !column.is_interned() {
            return Err(StoreError::index_corruption(name, None, "column is not interned"));
        }

        for (key, bucket) in index.iter() {
            if bucket.windows(2).any(|w| w[0] >= w[1]) {
                return Err(StoreError::index_corruption(name, None, format!("bucket {} not ascending", key)));
            }
            for &row in bucket {
                if column.id(row) != Some(key) {
                    return Err(StoreError::index_corruption(
                        name,
                        Some(row),
                        format!("row {} listed under {} but holds another value", row, key),
                    ));
                }
            }
        }

        if index.positions() != self.rows {
            return Err(StoreError::index_corruption(
                name,
                None,
                format!("{} positions indexed for {} rows", index.positions(), self.rows),
            ));
        }
        Ok(())
    }
}

impl Default for ColumnStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ColumnStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnStore")
            .field("options", &self.options)
            .field("rows", &self.rows)
            .field("distinct_strings", &self.strings.len())
            .finish_non_exhaustive()
    }
}
