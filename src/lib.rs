//! tickstore - In-memory row and column stores for daily market records
//!
//! Two layouts over the same record type:
//!
//! - `row`: records kept whole, every query scans
//! - `column`: one vector per field, interned strings, hash indexes on
//!   symbol and date
//!
//! `storage::Storage` puts both behind one handle. `field` provides the
//! compile-time accessors the queries are generic over.

pub mod cli;
pub mod column;
pub mod config;
pub mod errors;
pub mod field;
pub mod ingest;
pub mod observability;
pub mod record;
pub mod row;
pub mod storage;

pub use column::{ColumnStore, ColumnStoreOptions};
pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use record::{Record, RowId};
pub use row::RowStore;
pub use storage::Storage;
