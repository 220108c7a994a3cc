//! Metrics registry
//!
//! Counters only. Monotonic, reset only by creating a new registry.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::report::{AccessPath, Layout, Operation, OperationReport, Outcome};

/// Operational counters fed from operation reports
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Append calls, one per layout written
    appends: AtomicU64,
    /// Count, filter and aggregate calls
    queries_executed: AtomicU64,
    /// Queries answered from a hash index
    index_lookups: AtomicU64,
    /// Queries that scanned a column
    column_scans: AtomicU64,
    /// Queries that scanned row records
    row_scans: AtomicU64,
    /// Rows copied into filtered stores
    rows_materialized: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Update counters from one report
    pub fn record(&self, report: &OperationReport) {
        if report.operation == Operation::Append {
            self.appends.fetch_add(1, Ordering::Relaxed);
            return;
        }

        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        match (report.layout, report.path) {
            (_, AccessPath::Index) => self.index_lookups.fetch_add(1, Ordering::Relaxed),
            (Layout::Column, AccessPath::Scan) => self.column_scans.fetch_add(1, Ordering::Relaxed),
            (Layout::Row, AccessPath::Scan) => self.row_scans.fetch_add(1, Ordering::Relaxed),
        };

        if let (Operation::FilterEquals, Outcome::Rows(n)) = (report.operation, report.outcome) {
            self.rows_materialized.fetch_add(n as u64, Ordering::Relaxed);
        }
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            appends: self.appends.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            index_lookups: self.index_lookups.load(Ordering::Relaxed),
            column_scans: self.column_scans.load(Ordering::Relaxed),
            row_scans: self.row_scans.load(Ordering::Relaxed),
            rows_materialized: self.rows_materialized.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub appends: u64,
    pub queries_executed: u64,
    pub index_lookups: u64,
    pub column_scans: u64,
    pub row_scans: u64,
    pub rows_materialized: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldId;

    fn query(layout: Layout, path: AccessPath, op: Operation, outcome: Outcome) -> OperationReport {
        OperationReport::query(op, layout, FieldId::Symbol, path, 0, outcome)
    }

    #[test]
    fn test_new_registry_has_zero_values() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_routes_by_path() {
        let registry = MetricsRegistry::new();
        registry.record(&OperationReport::append(Layout::Column, 0, 1));
        registry.record(&OperationReport::append(Layout::Column, 0, 2));
        registry.record(&query(Layout::Column, AccessPath::Index, Operation::CountEquals, Outcome::Count(4)));
        registry.record(&query(Layout::Column, AccessPath::Scan, Operation::Sum, Outcome::Scalar(1.0)));
        registry.record(&query(Layout::Row, AccessPath::Scan, Operation::FilterEquals, Outcome::Rows(3)));

        let s = registry.snapshot();
        assert_eq!(s.appends, 2);
        assert_eq!(s.queries_executed, 3);
        assert_eq!(s.index_lookups, 1);
        assert_eq!(s.column_scans, 1);
        assert_eq!(s.row_scans, 1);
        assert_eq!(s.rows_materialized, 3);
    }

    #[test]
    fn test_snapshot_serializes_every_counter() {
        let registry = MetricsRegistry::new();
        registry.record(&OperationReport::append(Layout::Row, 0, 1));
        registry.record(&query(Layout::Column, AccessPath::Index, Operation::FilterEquals, Outcome::Rows(7)));

        let value = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(value["appends"], 1);
        assert_eq!(value["index_lookups"], 1);
        assert_eq!(value["rows_materialized"], 7);
        assert_eq!(value["row_scans"], 0);
        assert_eq!(value.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.record(&OperationReport::append(Layout::Row, 0, 1));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().appends, 800);
    }
}
