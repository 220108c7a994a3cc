//! Storage Facade Tests
//!
//! - `append` writes both layouts, or neither
//! - Single-layout appends leave the other layout alone
//! - Filters return storages with exactly one populated layout
//! - Both layouts report to the same observer

use std::sync::Arc;

use tickstore::column::ColumnStoreOptions;
use tickstore::field::{Date, High, Symbol, Volume};
use tickstore::observability::{AccessPath, Layout, MemoryObserver, Operation, Outcome};
use tickstore::{Record, Storage};

// =============================================================================
// Helper Functions
// =============================================================================

fn day(symbol: &str, date: &str, high: f32, volume: u32) -> Record {
    Record::new(symbol, date, high, high - 1.0, high - 0.5, high - 0.2, high - 0.3, volume, 1.0)
}

fn loaded(options: ColumnStoreOptions) -> Storage {
    let mut storage = Storage::with_options(options);
    storage.append(day("AAA", "2020-01-01", 10.0, 100)).unwrap();
    storage.append(day("BBB", "2020-01-01", 20.0, 200)).unwrap();
    storage.append(day("AAA", "2020-01-02", 12.0, 300)).unwrap();
    storage.append(day("CCC", "2020-01-02", 8.0, 400)).unwrap();
    storage
}

// =============================================================================
// Append
// =============================================================================

/// Append returns the shared row id and fills both layouts.
#[test]
fn test_append_returns_row_ids() {
    let mut storage = Storage::new();
    assert_eq!(storage.append(day("AAA", "2020-01-01", 1.0, 1)).unwrap(), 0);
    assert_eq!(storage.append(day("BBB", "2020-01-01", 1.0, 1)).unwrap(), 1);
    assert_eq!(storage.row_count(), 2);
    assert_eq!(storage.column_count(), 2);
}

/// The layouts are independent when written separately.
#[test]
fn test_layouts_can_diverge() {
    let mut storage = Storage::new();
    storage.append_row(day("AAA", "2020-01-01", 1.0, 10)).unwrap();
    storage.append_row(day("AAA", "2020-01-02", 1.0, 20)).unwrap();
    storage.append_column(&day("BBB", "2020-01-01", 1.0, 5)).unwrap();

    assert_eq!(storage.row_count(), 2);
    assert_eq!(storage.column_count(), 1);
    assert_eq!(storage.row_sum::<Volume>(), 30);
    assert_eq!(storage.column_sum::<Volume>(), 5);
}

// =============================================================================
// Queries
// =============================================================================

/// Row and column answers agree for every variant.
#[test]
fn test_layouts_agree() {
    for options in [
        ColumnStoreOptions::plain(),
        ColumnStoreOptions::interned(),
        ColumnStoreOptions::indexed(),
    ] {
        let storage = loaded(options);
        for symbol in ["AAA", "BBB", "CCC", "ZZZ"] {
            assert_eq!(
                storage.row_count_equals::<Symbol>(symbol),
                storage.column_count_equals::<Symbol>(symbol)
            );
        }
        assert_eq!(storage.row_count_equals::<Date>("2020-01-02"), 2);
        assert_eq!(storage.column_count_equals::<Date>("2020-01-02"), 2);
        assert_eq!(storage.row_max::<High>(), 20.0);
        assert_eq!(storage.column_max::<High>(), 20.0);
        assert_eq!(storage.row_min::<High>(), storage.column_min::<High>());
        assert_eq!(storage.row_sum::<Volume>(), 1000);
        assert_eq!(storage.column_sum::<Volume>(), 1000);
    }
}

/// Filters produce a storage with one populated layout.
#[test]
fn test_filters_populate_one_layout() {
    let storage = loaded(ColumnStoreOptions::indexed());

    let rows = storage.row_filter_equals::<Date>("2020-01-02");
    assert_eq!(rows.row_count(), 2);
    assert_eq!(rows.column_count(), 0);
    assert_eq!(rows.row_count_equals::<Symbol>("CCC"), 1);

    let columns = storage.column_filter_equals::<Date>("2020-01-02");
    assert_eq!(columns.row_count(), 0);
    assert_eq!(columns.column_count(), 2);
    assert_eq!(columns.column_count_equals::<Symbol>("CCC"), 1);
    columns.verify().unwrap();

    assert_eq!(storage.row_count(), 4);
    assert_eq!(storage.column_count(), 4);
}

/// Filtering an empty storage yields an empty storage.
#[test]
fn test_filter_empty_storage() {
    let storage = Storage::new();
    let filtered = storage.column_filter_equals::<Symbol>("AAA");
    assert_eq!(filtered.row_count(), 0);
    assert_eq!(filtered.column_count(), 0);
}

// =============================================================================
// Observability
// =============================================================================

/// Both layouts report to the storage's observer, filters inherit it.
#[test]
fn test_observer_shared_by_layouts() {
    let observer = MemoryObserver::new();
    let mut storage = Storage::new().with_observer(Arc::new(observer.clone()));

    storage.append(day("AAA", "2020-01-01", 1.0, 1)).unwrap();
    let appends = observer.reports();
    assert_eq!(appends.len(), 2);
    assert!(appends.iter().all(|r| r.operation == Operation::Append));
    observer.clear();

    storage.column_count_equals::<Symbol>("AAA");
    let report = observer.last().unwrap();
    assert_eq!(report.layout, Layout::Column);
    assert_eq!(report.path, AccessPath::Index);
    assert_eq!(report.outcome, Outcome::Count(1));

    storage.row_count_equals::<Symbol>("AAA");
    let report = observer.last().unwrap();
    assert_eq!(report.layout, Layout::Row);
    assert_eq!(report.path, AccessPath::Scan);

    let filtered = storage.column_filter_equals::<Symbol>("AAA");
    observer.clear();
    filtered.row_count_equals::<Symbol>("AAA");
    filtered.column_count_equals::<Symbol>("AAA");
    assert_eq!(observer.len(), 2);
}

/// Plain stores report scans for string equality.
#[test]
fn test_plain_store_reports_scan() {
    let observer = MemoryObserver::new();
    let storage = loaded(ColumnStoreOptions::plain()).with_observer(Arc::new(observer.clone()));

    storage.column_count_equals::<Symbol>("AAA");
    assert_eq!(observer.last().unwrap().path, AccessPath::Scan);
}
