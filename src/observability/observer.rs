//! Report sinks
//!
//! Stores hold an `Arc<dyn QueryObserver>` and hand every finished
//! operation to it. Filtered stores inherit their source's observer.

use std::sync::{Arc, Mutex};

use super::logger::{Logger, Severity};
use super::metrics::MetricsRegistry;
use super::report::OperationReport;

/// Receives one report per completed store operation
pub trait QueryObserver: Send + Sync {
    fn observe(&self, report: &OperationReport);
}

/// Discards reports
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl QueryObserver for NoopObserver {
    fn observe(&self, _report: &OperationReport) {}
}

/// Writes each report as one JSON log line
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    severity: Severity,
}

impl LogObserver {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }

    /// Flattens a report into logger fields
    pub fn fields(report: &OperationReport) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("layout", report.layout.as_str().to_string()),
            ("path", report.path.as_str().to_string()),
            ("elapsed_us", report.elapsed_micros.to_string()),
            ("result", report.outcome.to_string()),
        ];
        if let Some(field) = report.field {
            fields.push(("field", field.name().to_string()));
        }
        fields
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(Severity::Trace)
    }
}

impl QueryObserver for LogObserver {
    fn observe(&self, report: &OperationReport) {
        let owned = Self::fields(report);
        let fields: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
        Logger::log(self.severity, report.operation.as_str(), &fields);
    }
}

/// Feeds reports into a shared metrics registry
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    registry: Arc<MetricsRegistry>,
}

impl MetricsObserver {
    pub fn new(registry: Arc<MetricsRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }
}

impl QueryObserver for MetricsObserver {
    fn observe(&self, report: &OperationReport) {
        self.registry.record(report);
    }
}

/// Keeps every report in memory, in arrival order
#[derive(Debug, Clone, Default)]
pub struct MemoryObserver {
    reports: Arc<Mutex<Vec<OperationReport>>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports received so far
    pub fn reports(&self) -> Vec<OperationReport> {
        self.reports.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The most recent report
    pub fn last(&self) -> Option<OperationReport> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.reports.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl QueryObserver for MemoryObserver {
    fn observe(&self, report: &OperationReport) {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(report.clone());
    }
}
