//! Row-oriented store
//!
//! Records are kept whole, in append order. Every query is a linear scan.

use std::fmt;

use crate::errors::{StoreError, StoreResult};
use crate::field::{max_of, min_of, sum_of, Field, FieldId, Numeric, NumericField};
use crate::observability::{
    self, AccessPath, Layout, Operation, OperationReport, Outcome, SharedObserver, Timer,
};
use crate::record::{Record, RowId};

/// Ordered sequence of records
#[derive(Clone)]
pub struct RowStore {
    records: Vec<Record>,
    observer: SharedObserver,
}

impl RowStore {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            observer: observability::noop(),
        }
    }

    /// Takes ownership of already ordered records
    pub fn from_records(records: Vec<Record>) -> StoreResult<Self> {
        check_row_limit(0, records.len())?;
        Ok(Self {
            records,
            observer: observability::noop(),
        })
    }

    /// Replaces the observer that receives operation reports
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn observer(&self) -> &SharedObserver {
        &self.observer
    }

    /// Makes room for `additional` records, so the next appends cannot fail
    pub fn reserve(&mut self, additional: usize) -> StoreResult<()> {
        check_row_limit(self.records.len(), additional)?;
        self.records
            .try_reserve(additional)
            .map_err(|e| StoreError::capacity_exhausted("row records", e))
    }

    /// Appends `record` at the end
    pub fn append(&mut self, record: Record) -> StoreResult<RowId> {
        let timer = Timer::new();
        let row = self.records.len() as RowId;
        self.reserve(1)?;

        self.records.push(record);

        self.observer.observe(&OperationReport::append(
            Layout::Row,
            timer.elapsed_micros(),
            self.records.len(),
        ));
        Ok(row)
    }

    /// Number of records
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, row: RowId) -> Option<&Record> {
        self.records.get(row as usize)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records whose field equals `value`
    pub fn count_equals<F: Field>(&self, value: &F::Value) -> usize {
        let timer = Timer::new();
        let count = self.records.iter().filter(|r| F::of(r) == value).count();
        self.report(Operation::CountEquals, F::ID, timer, Outcome::Count(count));
        count
    }

    /// New store holding, in order, the records whose field equals `value`
    pub fn filter_equals<F: Field>(&self, value: &F::Value) -> RowStore {
        let timer = Timer::new();
        let records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| F::of(r) == value)
            .cloned()
            .collect();
        self.report(Operation::FilterEquals, F::ID, timer, Outcome::Rows(records.len()));

        RowStore {
            records,
            observer: self.observer.clone(),
        }
    }

    /// Largest value of the field, `LOWEST` when empty
    pub fn max<F: NumericField>(&self) -> F::Num {
        let timer = Timer::new();
        let max = max_of(self.records.iter().map(F::value));
        self.report(Operation::Max, F::ID, timer, Outcome::Scalar(max.to_f64()));
        max
    }

    /// Smallest value of the field, `HIGHEST` when empty
    pub fn min<F: NumericField>(&self) -> F::Num {
        let timer = Timer::new();
        let min = min_of(self.records.iter().map(F::value));
        self.report(Operation::Min, F::ID, timer, Outcome::Scalar(min.to_f64()));
        min
    }

    /// Sum of the field in its own numeric type
    pub fn sum<F: NumericField>(&self) -> F::Num {
        let timer = Timer::new();
        let sum = sum_of(self.records.iter().map(F::value));
        self.report(Operation::Sum, F::ID, timer, Outcome::Scalar(sum.to_f64()));
        sum
    }

    fn report(&self, operation: Operation, field: FieldId, timer: Timer, outcome: Outcome) {
        self.observer.observe(&OperationReport::query(
            operation,
            Layout::Row,
            field,
            AccessPath::Scan,
            timer.elapsed_micros(),
            outcome,
        ));
    }
}

/// Rows are addressed by `RowId`, so the last position must fit in it
fn check_row_limit(current: usize, additional: usize) -> StoreResult<()> {
    if additional == 0 {
        return Ok(());
    }
    let last = current.saturating_add(additional - 1);
    RowId::try_from(last)
        .map(|_| ())
        .map_err(|_| StoreError::row_limit(current))
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RowStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStore")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a RowStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
