//! Store configuration
//!
//! Loaded from a JSON file. Every field is optional; a missing file is an
//! error, an empty object yields the defaults.
//!
//! ```json
//! {
//!   "intern_strings": true,
//!   "index_symbol": true,
//!   "index_date": false,
//!   "initial_capacity": 100000,
//!   "observer": "log"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::column::ColumnStoreOptions;
use crate::observability::{self, LogObserver, MetricsObserver, MetricsRegistry, SharedObserver};
use crate::storage::Storage;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where operation reports go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserverKind {
    /// Reports are dropped
    #[default]
    None,
    /// One JSON log line per operation
    Log,
    /// Counters in a `MetricsRegistry`
    Metrics,
}

/// Store configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Intern symbol and date strings in the column store
    #[serde(default = "default_true")]
    pub intern_strings: bool,

    /// Hash index on the symbol column (requires interning)
    #[serde(default = "default_true")]
    pub index_symbol: bool,

    /// Hash index on the date column (requires interning)
    #[serde(default = "default_true")]
    pub index_date: bool,

    /// Rows to reserve up front in both layouts
    #[serde(default)]
    pub initial_capacity: usize,

    #[serde(default)]
    pub observer: ObserverKind,
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            intern_strings: true,
            index_symbol: true,
            index_date: true,
            initial_capacity: 0,
            observer: ObserverKind::None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: StoreConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects combinations the column store would silently ignore
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.intern_strings && (self.index_symbol || self.index_date) {
            return Err(ConfigError::Invalid(
                "index_symbol and index_date require intern_strings".to_string(),
            ));
        }
        Ok(())
    }

    pub fn column_options(&self) -> ColumnStoreOptions {
        ColumnStoreOptions {
            intern_strings: self.intern_strings,
            index_symbol: self.index_symbol,
            index_date: self.index_date,
        }
    }

    /// Observer for the configured kind, with a fresh registry for metrics
    pub fn build_observer(&self) -> SharedObserver {
        self.build_observer_with(&Arc::new(MetricsRegistry::new()))
    }

    /// Observer for the configured kind; `registry` receives metrics
    pub fn build_observer_with(&self, registry: &Arc<MetricsRegistry>) -> SharedObserver {
        match self.observer {
            ObserverKind::None => observability::noop(),
            ObserverKind::Log => Arc::new(LogObserver::default()),
            ObserverKind::Metrics => Arc::new(MetricsObserver::new(Arc::clone(registry))),
        }
    }

    /// Empty storage shaped by this configuration
    pub fn build_storage(&self, observer: SharedObserver) -> Storage {
        Storage::with_capacity(self.column_options(), self.initial_capacity).with_observer(observer)
    }
}
