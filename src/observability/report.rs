//! Operation reports
//!
//! Every store operation produces one `OperationReport` after it completes.
//! Reports are advisory: they never feed back into query results.

use std::fmt;

use crate::field::FieldId;

/// Store operations that emit reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Row appended
    Append,
    /// Count of rows equal to a value
    CountEquals,
    /// New store holding rows equal to a value
    FilterEquals,
    /// Largest value of a field
    Max,
    /// Smallest value of a field
    Min,
    /// Sum of a field
    Sum,
}

impl Operation {
    /// Returns the event name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Append => "APPEND",
            Operation::CountEquals => "COUNT_EQUALS",
            Operation::FilterEquals => "FILTER_EQUALS",
            Operation::Max => "MAX",
            Operation::Min => "MIN",
            Operation::Sum => "SUM",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical layout an operation ran against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Row,
    Column,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Row => "row",
            Layout::Column => "column",
        }
    }
}

/// How the matching rows were located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPath {
    /// Every row or column entry was visited
    Scan,
    /// Positions came from a hash index bucket
    Index,
}

impl AccessPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPath::Scan => "scan",
            AccessPath::Index => "index",
        }
    }
}

/// Result summary carried by a report
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Number of matches found
    Count(usize),
    /// Number of rows in the produced store
    Rows(usize),
    /// Aggregate value
    Scalar(f64),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Count(n) => write!(f, "{} elements found", n),
            Outcome::Rows(n) => write!(f, "{} elements left", n),
            Outcome::Scalar(v) => write!(f, "{}", v),
        }
    }
}

/// What a single operation did and how long it took
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport {
    pub operation: Operation,
    pub layout: Layout,
    /// Target field; `None` for whole-row operations such as append
    pub field: Option<FieldId>,
    pub path: AccessPath,
    pub elapsed_micros: u64,
    pub outcome: Outcome,
}

impl OperationReport {
    /// Report for a query on one field
    pub fn query(
        operation: Operation,
        layout: Layout,
        field: FieldId,
        path: AccessPath,
        elapsed_micros: u64,
        outcome: Outcome,
    ) -> Self {
        Self {
            operation,
            layout,
            field: Some(field),
            path,
            elapsed_micros,
            outcome,
        }
    }

    /// Report for a completed append
    pub fn append(layout: Layout, elapsed_micros: u64, rows: usize) -> Self {
        Self {
            operation: Operation::Append,
            layout,
            field: None,
            path: AccessPath::Scan,
            elapsed_micros,
            outcome: Outcome::Rows(rows),
        }
    }
}

impl fmt::Display for OperationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.operation, self.layout.as_str())?;
        if let Some(field) = self.field {
            write!(f, ", {}, {}", field, self.path.as_str())?;
        }
        write!(f, ") : {}[µs] -> {}", self.elapsed_micros, self.outcome)
    }
}
