//! Column store variants

use serde::{Deserialize, Serialize};

/// Chooses between the plain and the interned + indexed column layout.
///
/// Indexes are keyed by interned ids, so an index flag only takes effect
/// when `intern_strings` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStoreOptions {
    /// Store one canonical copy per distinct symbol/date string
    #[serde(default = "default_true")]
    pub intern_strings: bool,
    /// Maintain a hash index on the symbol column
    #[serde(default = "default_true")]
    pub index_symbol: bool,
    /// Maintain a hash index on the date column
    #[serde(default = "default_true")]
    pub index_date: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ColumnStoreOptions {
    fn default() -> Self {
        Self::indexed()
    }
}

impl ColumnStoreOptions {
    /// Interned strings with both string columns indexed
    pub fn indexed() -> Self {
        Self {
            intern_strings: true,
            index_symbol: true,
            index_date: true,
        }
    }

    /// Interned strings, no indexes
    pub fn interned() -> Self {
        Self {
            intern_strings: true,
            index_symbol: false,
            index_date: false,
        }
    }

    /// One owned string per row, no indexes
    pub fn plain() -> Self {
        Self {
            intern_strings: false,
            index_symbol: false,
            index_date: false,
        }
    }

    /// Whether the symbol index is actually maintained
    pub fn symbol_indexed(&self) -> bool {
        self.intern_strings && self.index_symbol
    }

    /// Whether the date index is actually maintained
    pub fn date_indexed(&self) -> bool {
        self.intern_strings && self.index_date
    }
}
