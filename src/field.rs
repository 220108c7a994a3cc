//! Field accessors
//!
//! Each record field has a zero-sized tag type (`Symbol`, `High`, ...).
//! Generic store operations take the tag as a type parameter:
//!
//! ```ignore
//! let n = rows.count_equals::<Symbol>("AAA");
//! let top = columns.max::<High>();
//! ```
//!
//! - `Field` extracts the value from a `Record` (row layout).
//! - `NumericField` exposes the field's column slice (column layout).
//! - `ColumnField` locates matching positions in a `ColumnStore`. Numeric
//!   fields scan their column. `Symbol` and `Date` are specialized to answer
//!   from the store's hash index when it has one and to scan otherwise.

use std::fmt;

use crate::column::{ColumnStore, HashIndex, StringTable};
use crate::column::string_column::matching_positions;
use crate::observability::AccessPath;
use crate::record::{Record, RowId};

/// Names every record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Symbol,
    Date,
    High,
    Low,
    Open,
    Close,
    CloseAdjusted,
    Volume,
    SplitCoefficient,
}

impl FieldId {
    /// All fields in ingestion order
    pub const ALL: [FieldId; 9] = [
        FieldId::Symbol,
        FieldId::Date,
        FieldId::High,
        FieldId::Low,
        FieldId::Open,
        FieldId::Close,
        FieldId::CloseAdjusted,
        FieldId::Volume,
        FieldId::SplitCoefficient,
    ];

    /// Field name as used in records and logs
    pub fn name(&self) -> &'static str {
        match self {
            FieldId::Symbol => "symbol",
            FieldId::Date => "date",
            FieldId::High => "high",
            FieldId::Low => "low",
            FieldId::Open => "open",
            FieldId::Close => "close",
            FieldId::CloseAdjusted => "close_adjusted",
            FieldId::Volume => "volume",
            FieldId::SplitCoefficient => "split_coefficient",
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, FieldId::Symbol | FieldId::Date)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Numeric column types
pub trait Numeric: Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Result of `max` over no values
    const LOWEST: Self;
    /// Result of `min` over no values
    const HIGHEST: Self;
    /// Result of `sum` over no values
    const ZERO: Self;

    /// Adds `value` in the type's own arithmetic
    fn accumulate(self, value: Self) -> Self;

    /// Lossless widening for reports
    fn to_f64(self) -> f64;
}

impl Numeric for f32 {
    const LOWEST: Self = f32::MIN;
    const HIGHEST: Self = f32::MAX;
    const ZERO: Self = 0.0;

    fn accumulate(self, value: Self) -> Self {
        self + value
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Numeric for u32 {
    const LOWEST: Self = u32::MIN;
    const HIGHEST: Self = u32::MAX;
    const ZERO: Self = 0;

    // Fixed-width unsigned arithmetic wraps.
    fn accumulate(self, value: Self) -> Self {
        self.wrapping_add(value)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

/// Largest value, or `T::LOWEST` when empty. NaN never wins.
pub fn max_of<T: Numeric>(values: impl IntoIterator<Item = T>) -> T {
    values
        .into_iter()
        .fold(T::LOWEST, |acc, v| if v > acc { v } else { acc })
}

/// Smallest value, or `T::HIGHEST` when empty. NaN never wins.
pub fn min_of<T: Numeric>(values: impl IntoIterator<Item = T>) -> T {
    values
        .into_iter()
        .fold(T::HIGHEST, |acc, v| if v < acc { v } else { acc })
}

/// Sum starting from `T::ZERO`
pub fn sum_of<T: Numeric>(values: impl IntoIterator<Item = T>) -> T {
    values.into_iter().fold(T::ZERO, Numeric::accumulate)
}

/// Extracts one field from a record
pub trait Field {
    type Value: ?Sized + PartialEq + fmt::Debug;
    const ID: FieldId;

    fn of(record: &Record) -> &Self::Value;
}

/// A field with a numeric column
pub trait NumericField: Field {
    type Num: Numeric;

    fn value(record: &Record) -> Self::Num;
    fn column(store: &ColumnStore) -> &[Self::Num];
}

/// Matching positions found in a column store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Borrowed straight from a hash index bucket
    Indexed(&'a [RowId]),
    /// Collected by scanning the column
    Scanned(Vec<RowId>),
}

impl Lookup<'_> {
    /// Positions, ascending
    pub fn positions(&self) -> &[RowId] {
        match self {
            Lookup::Indexed(rows) => *rows,
            Lookup::Scanned(rows) => rows.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions().is_empty()
    }

    pub fn path(&self) -> AccessPath {
        match self {
            Lookup::Indexed(_) => AccessPath::Index,
            Lookup::Scanned(_) => AccessPath::Scan,
        }
    }
}

/// Locates rows equal to a value in a column store
pub trait ColumnField: Field {
    /// Scans the column; never consults an index
    fn scan(store: &ColumnStore, value: &Self::Value) -> Vec<RowId>;

    /// Counts by scanning the column
    fn scan_count(store: &ColumnStore, value: &Self::Value) -> usize {
        Self::scan(store, value).len()
    }

    /// Fastest available way to collect matching positions
    fn lookup<'a>(store: &'a ColumnStore, value: &Self::Value) -> Lookup<'a> {
        Lookup::Scanned(Self::scan(store, value))
    }

    /// Fastest available way to count matching positions
    fn count(store: &ColumnStore, value: &Self::Value) -> (usize, AccessPath) {
        (Self::scan_count(store, value), AccessPath::Scan)
    }
}

fn bucket<'a>(index: &'a HashIndex, table: &StringTable, value: &str) -> &'a [RowId] {
    match table.get(value) {
        Some(id) => index.lookup(id),
        None => &[],
    }
}

/// Ticker symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Symbol;

impl Field for Symbol {
    type Value = str;
    const ID: FieldId = FieldId::Symbol;

    fn of(record: &Record) -> &str {
        &record.symbol
    }
}

impl ColumnField for Symbol {
    fn scan(store: &ColumnStore, value: &str) -> Vec<RowId> {
        store.symbol_column().positions_of(value, store.strings())
    }

    fn scan_count(store: &ColumnStore, value: &str) -> usize {
        store.symbol_column().count_of(value, store.strings())
    }

    fn lookup<'a>(store: &'a ColumnStore, value: &str) -> Lookup<'a> {
        match store.symbol_index() {
            Some(index) => Lookup::Indexed(bucket(index, store.strings(), value)),
            None => Lookup::Scanned(Self::scan(store, value)),
        }
    }

    fn count(store: &ColumnStore, value: &str) -> (usize, AccessPath) {
        match store.symbol_index() {
            Some(index) => (bucket(index, store.strings(), value).len(), AccessPath::Index),
            None => (Self::scan_count(store, value), AccessPath::Scan),
        }
    }
}

/// Trading date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Date;

impl Field for Date {
    type Value = str;
    const ID: FieldId = FieldId::Date;

    fn of(record: &Record) -> &str {
        &record.date
    }
}

impl ColumnField for Date {
    fn scan(store: &ColumnStore, value: &str) -> Vec<RowId> {
        store.date_column().positions_of(value, store.strings())
    }

    fn scan_count(store: &ColumnStore, value: &str) -> usize {
        store.date_column().count_of(value, store.strings())
    }

    fn lookup<'a>(store: &'a ColumnStore, value: &str) -> Lookup<'a> {
        match store.date_index() {
            Some(index) => Lookup::Indexed(bucket(index, store.strings(), value)),
            None => Lookup::Scanned(Self::scan(store, value)),
        }
    }

    fn count(store: &ColumnStore, value: &str) -> (usize, AccessPath) {
        match store.date_index() {
            Some(index) => (bucket(index, store.strings(), value).len(), AccessPath::Index),
            None => (Self::scan_count(store, value), AccessPath::Scan),
        }
    }
}

macro_rules! numeric_field {
    ($(#[$doc:meta])* $tag:ident: $ty:ty => $member:ident, $column:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $tag;

        impl Field for $tag {
            type Value = $ty;
            const ID: FieldId = FieldId::$tag;

            fn of(record: &Record) -> &$ty {
                &record.$member
            }
        }

        impl NumericField for $tag {
            type Num = $ty;

            fn value(record: &Record) -> $ty {
                record.$member
            }

            fn column(store: &ColumnStore) -> &[$ty] {
                store.$column()
            }
        }

        impl ColumnField for $tag {
            fn scan(store: &ColumnStore, value: &$ty) -> Vec<RowId> {
                matching_positions(store.$column().iter().map(|v| v == value))
            }

            fn scan_count(store: &ColumnStore, value: &$ty) -> usize {
                store.$column().iter().filter(|v| *v == value).count()
            }
        }
    };
}

numeric_field!(
    /// Session high
    High: f32 => high, high_column
);
numeric_field!(
    /// Session low
    Low: f32 => low, low_column
);
numeric_field!(
    /// Opening price
    Open: f32 => open, open_column
);
numeric_field!(
    /// Closing price
    Close: f32 => close, close_column
);
numeric_field!(
    /// Adjusted close
    CloseAdjusted: f32 => close_adjusted, close_adjusted_column
);
numeric_field!(
    /// Traded volume
    Volume: u32 => volume, volume_column
);
numeric_field!(
    /// Split coefficient
    SplitCoefficient: f32 => split_coefficient, split_coefficient_column
);

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record::new("AAA", "2020-01-01", 10.0, 9.0, 9.5, 9.8, 9.7, 100, 1.0)
    }

    #[test]
    fn test_tags_extract_their_field() {
        let r = record();
        assert_eq!(Symbol::of(&r), "AAA");
        assert_eq!(Date::of(&r), "2020-01-01");
        assert_eq!(*High::of(&r), 10.0);
        assert_eq!(Low::value(&r), 9.0);
        assert_eq!(Open::value(&r), 9.5);
        assert_eq!(Close::value(&r), 9.8);
        assert_eq!(CloseAdjusted::value(&r), 9.7);
        assert_eq!(Volume::value(&r), 100);
        assert_eq!(SplitCoefficient::value(&r), 1.0);
    }

    #[test]
    fn test_tag_ids() {
        assert_eq!(Symbol::ID, FieldId::Symbol);
        assert_eq!(CloseAdjusted::ID.name(), "close_adjusted");
        assert!(Date::ID.is_string());
        assert!(!Volume::ID.is_string());
        assert_eq!(FieldId::ALL.len(), 9);
    }

    #[test]
    fn test_empty_aggregates_use_sentinels() {
        assert_eq!(max_of(Vec::<f32>::new()), f32::MIN);
        assert_eq!(min_of(Vec::<f32>::new()), f32::MAX);
        assert_eq!(sum_of(Vec::<f32>::new()), 0.0);
        assert_eq!(max_of(Vec::<u32>::new()), 0);
        assert_eq!(min_of(Vec::<u32>::new()), u32::MAX);
        assert_eq!(sum_of(Vec::<u32>::new()), 0);
    }

    #[test]
    fn test_aggregates() {
        assert_eq!(max_of([10.0f32, 20.0, 5.0]), 20.0);
        assert_eq!(min_of([10.0f32, 20.0, 5.0]), 5.0);
        assert_eq!(sum_of([100u32, 200, 300]), 600);
    }

    #[test]
    fn test_nan_ignored_by_extremes() {
        assert_eq!(max_of([1.0f32, f32::NAN, 3.0]), 3.0);
        assert_eq!(min_of([f32::NAN, 2.0, 1.5]), 1.5);
    }

    #[test]
    fn test_volume_sum_wraps() {
        assert_eq!(sum_of([u32::MAX, 2]), 1);
    }
}
