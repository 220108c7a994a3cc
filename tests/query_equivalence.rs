//! Query Equivalence Tests
//!
//! The row store, every column store variant, index lookups and column
//! scans must agree on every query over the same records.
//!
//! Data is generated from a fixed seed so failures reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tickstore::column::{ColumnStore, ColumnStoreOptions};
use tickstore::field::{
    Close, CloseAdjusted, Date, High, Low, NumericField, Open, SplitCoefficient, Symbol, Volume,
};
use tickstore::observability::AccessPath;
use tickstore::{Record, RowStore};

// =============================================================================
// Helper Functions
// =============================================================================

const SYMBOLS: [&str; 6] = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"];

fn random_records(seed: u64, n: usize) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let symbol = SYMBOLS[rng.gen_range(0..SYMBOLS.len())];
            let date = format!("2021-03-{:02}", rng.gen_range(1..=20));
            let low: f32 = rng.gen_range(1.0..100.0);
            let high = low + rng.gen_range(0.0..10.0);
            let open = rng.gen_range(low..=high);
            let close = rng.gen_range(low..=high);
            Record::new(
                symbol,
                date,
                high,
                low,
                open,
                close,
                close * 0.98,
                rng.gen_range(0..10_000),
                if rng.gen_bool(0.05) { 2.0 } else { 1.0 },
            )
        })
        .collect()
}

struct Stores {
    rows: RowStore,
    columns: Vec<ColumnStore>,
}

fn build(records: &[Record]) -> Stores {
    let columns = [
        ColumnStoreOptions::plain(),
        ColumnStoreOptions::interned(),
        ColumnStoreOptions::indexed(),
    ]
    .into_iter()
    .map(|options| ColumnStore::from_records(options, records).unwrap())
    .collect();

    Stores {
        rows: RowStore::from_records(records.to_vec()).unwrap(),
        columns,
    }
}

fn assert_aggregates_agree<F: NumericField>(stores: &Stores) {
    for column in &stores.columns {
        assert_eq!(column.max::<F>(), stores.rows.max::<F>(), "max {:?}", F::ID);
        assert_eq!(column.min::<F>(), stores.rows.min::<F>(), "min {:?}", F::ID);
        assert_eq!(column.sum::<F>(), stores.rows.sum::<F>(), "sum {:?}", F::ID);
    }
}

// =============================================================================
// Concrete Scenario
// =============================================================================

/// AAA, BBB, AAA appended in order.
#[test]
fn test_three_record_scenario() {
    let records = vec![
        Record::new("AAA", "2020-01-01", 10.0, 9.0, 9.5, 9.8, 9.7, 100, 1.0),
        Record::new("BBB", "2020-01-02", 20.0, 18.0, 19.0, 19.5, 19.4, 200, 1.0),
        Record::new("AAA", "2020-01-01", 5.0, 4.0, 4.5, 4.8, 4.7, 300, 1.0),
    ];
    let stores = build(&records);

    for column in &stores.columns {
        assert_eq!(column.count_equals::<Symbol>("AAA"), 2);
        assert_eq!(column.count_equals::<Symbol>("BBB"), 1);
        assert_eq!(column.count_equals::<Symbol>("ZZZ"), 0);
        assert_eq!(column.count_equals::<Date>("2020-01-01"), 2);
        assert_eq!(column.sum::<Volume>(), 600);
        assert_eq!(column.max::<High>(), 20.0);
        assert_eq!(column.min::<Low>(), 4.0);

        let aaa = column.filter_equals::<Symbol>("AAA");
        assert_eq!(aaa.rows().collect::<Vec<_>>(), vec![records[0].clone(), records[2].clone()]);
    }

    assert_eq!(stores.rows.count_equals::<Symbol>("AAA"), 2);
    assert_eq!(stores.rows.sum::<Volume>(), 600);
}

// =============================================================================
// Randomized Equivalence
// =============================================================================

/// Index lookups return exactly the positions a scan finds.
#[test]
fn test_index_matches_scan() {
    let records = random_records(7, 2_000);
    let store = ColumnStore::from_records(ColumnStoreOptions::indexed(), &records).unwrap();

    for symbol in SYMBOLS.iter().copied().chain(["ZZZ"]) {
        let lookup = store.lookup::<Symbol>(symbol);
        assert_eq!(lookup.path(), AccessPath::Index);
        assert_eq!(lookup.positions(), store.scan_positions::<Symbol>(symbol).as_slice());
    }
    for day in 1..=21 {
        let date = format!("2021-03-{:02}", day);
        let lookup = store.lookup::<Date>(&date);
        assert_eq!(lookup.positions(), store.scan_positions::<Date>(&date).as_slice());
    }
}

/// Count agrees with filter size on every layout.
#[test]
fn test_count_matches_filter() {
    let stores = build(&random_records(11, 1_000));

    for symbol in SYMBOLS {
        let expected = stores.rows.count_equals::<Symbol>(symbol);
        assert_eq!(stores.rows.filter_equals::<Symbol>(symbol).count(), expected);
        for column in &stores.columns {
            assert_eq!(column.count_equals::<Symbol>(symbol), expected);
            assert_eq!(column.filter_equals::<Symbol>(symbol).count(), expected);
        }
    }
}

/// Filtered column stores reconstruct the same records as the row filter.
#[test]
fn test_filters_reconstruct_same_records() {
    let stores = build(&random_records(13, 800));
    let date = "2021-03-05";

    let expected = stores.rows.filter_equals::<Date>(date);
    for column in &stores.columns {
        let filtered = column.filter_equals::<Date>(date);
        assert_eq!(filtered.rows().collect::<Vec<_>>(), expected.records());
    }
}

/// Numeric equality filters agree between layouts.
#[test]
fn test_numeric_equality_agrees() {
    let records = random_records(17, 500);
    let stores = build(&records);

    for probe in records.iter().step_by(50) {
        let expected = stores.rows.count_equals::<Volume>(&probe.volume);
        assert!(expected >= 1);
        for column in &stores.columns {
            assert_eq!(column.count_equals::<Volume>(&probe.volume), expected);
            assert_eq!(
                column.count_equals::<Close>(&probe.close),
                stores.rows.count_equals::<Close>(&probe.close)
            );
        }
    }
}

/// Every aggregate agrees between layouts.
#[test]
fn test_aggregates_agree() {
    let stores = build(&random_records(19, 1_500));

    assert_aggregates_agree::<High>(&stores);
    assert_aggregates_agree::<Low>(&stores);
    assert_aggregates_agree::<Open>(&stores);
    assert_aggregates_agree::<Close>(&stores);
    assert_aggregates_agree::<CloseAdjusted>(&stores);
    assert_aggregates_agree::<Volume>(&stores);
    assert_aggregates_agree::<SplitCoefficient>(&stores);
}

/// Every stored row reconstructs to the record that was appended.
#[test]
fn test_reconstruction_fidelity() {
    let records = random_records(23, 300);
    let stores = build(&records);

    for column in &stores.columns {
        assert_eq!(column.rows().collect::<Vec<_>>(), records);
    }
    assert_eq!(stores.rows.records(), records.as_slice());
}

/// Empty stores return the sentinels on both layouts.
#[test]
fn test_empty_sentinels() {
    let stores = build(&[]);

    for column in &stores.columns {
        assert_eq!(column.max::<High>(), f32::MIN);
        assert_eq!(column.min::<High>(), f32::MAX);
        assert_eq!(column.sum::<Volume>(), 0);
        assert_eq!(column.count_equals::<Symbol>("AAA"), 0);
        assert!(column.filter_equals::<Symbol>("AAA").is_empty());
    }
    assert_eq!(stores.rows.max::<High>(), f32::MIN);
    assert_eq!(stores.rows.min::<Volume>(), u32::MAX);
}
