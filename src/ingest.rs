//! JSON-lines ingestion
//!
//! One `Record` object per line, fields named as in `Record`. Blank lines
//! are skipped. Line numbers in errors are 1-based.

use std::io::BufRead;

use thiserror::Error;

use crate::errors::StoreError;
use crate::record::Record;
use crate::storage::Storage;

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid record at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IngestError {
    /// Line the error was raised on, if it came from the reader
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { line, .. } | Self::Json { line, .. } => Some(*line),
            Self::Store(_) => None,
        }
    }
}

/// Parses every record in `reader`, in order
pub fn read_records<R: BufRead>(reader: R) -> IngestResult<Vec<Record>> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|source| IngestError::Io {
            line: line_no,
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| IngestError::Json {
            line: line_no,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Appends every record in `reader` to both layouts of `storage`.
///
/// Parsing finishes before the first append, so a malformed line leaves
/// `storage` untouched. Returns the number of records appended.
pub fn load_into<R: BufRead>(storage: &mut Storage, reader: R) -> IngestResult<usize> {
    let records = read_records(reader)?;
    let count = records.len();
    for record in records {
        storage.append(record)?;
    }
    Ok(count)
}
