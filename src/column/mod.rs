//! Column store subsystem
//!
//! # Design Principles
//!
//! - One contiguous vector per field; numeric aggregates touch a single column
//! - Symbol and date strings interned once per store, columns hold ids
//! - Hash index per string column: value -> ascending row positions
//! - Queries never mutate; filters build a fresh store
//!
//! # Variants
//!
//! - Plain: owned string per row, every lookup scans
//! - Interned + indexed: the default; symbol/date equality answered from the index

mod hash_index;
mod intern;
mod options;
mod store;
pub(crate) mod string_column;

pub use hash_index::{HashIndex, Reservation};
pub use intern::{StringId, StringTable};
pub use options::ColumnStoreOptions;
pub use store::{ColumnStore, RowView};
pub use string_column::StringColumn;
