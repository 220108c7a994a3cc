//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Per-operation reports with elapsed time and result summary
//! - Counter metrics
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on query results
//! 3. No async or background threads
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tickstore::observability::{LogObserver, QueryObserver};
//! use tickstore::column::ColumnStore;
//!
//! let store = ColumnStore::new().with_observer(Arc::new(LogObserver::default()));
//! ```

mod logger;
mod metrics;
mod observer;
mod report;
mod timer;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use observer::{LogObserver, MemoryObserver, MetricsObserver, NoopObserver, QueryObserver};
pub use report::{AccessPath, Layout, Operation, OperationReport, Outcome};
pub use timer::Timer;

use std::sync::Arc;

/// Observer handle shared between a store and the stores it produces
pub type SharedObserver = Arc<dyn QueryObserver>;

/// The observer used when none is configured
pub fn noop() -> SharedObserver {
    Arc::new(NoopObserver)
}
