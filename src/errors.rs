//! Store error types
//!
//! Error codes:
//! - TICK_ROW_LIMIT (ERROR)
//! - TICK_CAPACITY_EXHAUSTED (ERROR)
//! - TICK_LENGTH_MISMATCH (FATAL)
//! - TICK_DANGLING_STRING (FATAL)
//! - TICK_INDEX_CORRUPTION (FATAL)
//!
//! Queries never fail. Only `append` can return an ERROR, and it does so
//! before touching any column. FATAL codes are produced by `verify()` and
//! mean a structural invariant was broken.

use std::collections::TryReserveError;
use std::fmt;

use crate::record::RowId;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation rejected, store unchanged
    Error,
    /// Store structure is inconsistent
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Row positions are 32-bit; the store is full
    TickRowLimit,
    /// Allocation for the new row could not be reserved
    TickCapacityExhausted,
    /// Column lengths disagree with the row count
    TickLengthMismatch,
    /// A string column refers to a missing intern table entry
    TickDanglingString,
    /// A hash index disagrees with its column
    TickIndexCorruption,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::TickRowLimit => "TICK_ROW_LIMIT",
            StoreErrorCode::TickCapacityExhausted => "TICK_CAPACITY_EXHAUSTED",
            StoreErrorCode::TickLengthMismatch => "TICK_LENGTH_MISMATCH",
            StoreErrorCode::TickDanglingString => "TICK_DANGLING_STRING",
            StoreErrorCode::TickIndexCorruption => "TICK_INDEX_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::TickRowLimit | StoreErrorCode::TickCapacityExhausted => Severity::Error,
            _ => Severity::Fatal,
        }
    }

    /// Returns the store invariant this error guards
    pub fn invariant(&self) -> &'static str {
        match self {
            StoreErrorCode::TickRowLimit => "row ids fit in u32",
            StoreErrorCode::TickCapacityExhausted => "append is atomic",
            StoreErrorCode::TickLengthMismatch => "columns share one length",
            StoreErrorCode::TickDanglingString => "string ids resolve",
            StoreErrorCode::TickIndexCorruption => "index mirrors column",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error type with full context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    row: Option<RowId>,
}

impl StoreError {
    /// The store already holds `u32::MAX` rows
    pub fn row_limit(count: usize) -> Self {
        Self {
            code: StoreErrorCode::TickRowLimit,
            message: format!("cannot append past {} rows", count),
            row: None,
        }
    }

    /// Reservation for one more row failed
    pub fn capacity_exhausted(what: &str, source: TryReserveError) -> Self {
        Self {
            code: StoreErrorCode::TickCapacityExhausted,
            message: format!("failed to reserve {}: {}", what, source),
            row: None,
        }
    }

    /// A column length differs from the row count
    pub fn length_mismatch(column: &str, len: usize, expected: usize) -> Self {
        Self {
            code: StoreErrorCode::TickLengthMismatch,
            message: format!("column {} has {} entries, expected {}", column, len, expected),
            row: None,
        }
    }

    /// A string id has no entry in the intern table
    pub fn dangling_string(column: &str, row: RowId) -> Self {
        Self {
            code: StoreErrorCode::TickDanglingString,
            message: format!("column {} at row {} points outside the string table", column, row),
            row: Some(row),
        }
    }

    /// Index bucket contents disagree with the column
    pub fn index_corruption(column: &str, row: Option<RowId>, reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::TickIndexCorruption,
            message: format!("index on {}: {}", column, reason.into()),
            row,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending row if one is known
    pub fn row(&self) -> Option<RowId> {
        self.row
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        write!(f, " [violates: {}]", self.code.invariant())?;
        Ok(())
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
