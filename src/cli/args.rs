//! CLI argument definitions using clap
//!
//! Commands:
//! - tickstore count --data <file>
//! - tickstore count-equals --data <file> --field <field> --value <value>
//! - tickstore aggregate --data <file> --field <field> --op <min|max|sum>
//! - tickstore filter --data <file> --field <field> --value <value>
//!
//! `--config <path>` is accepted before or after the subcommand.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::field::FieldId;
use crate::observability::Layout;

/// tickstore - query market records in row or column layout
#[derive(Parser, Debug)]
#[command(name = "tickstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a data file and report row counts for both layouts
    Count {
        /// JSON-lines file of records
        #[arg(long)]
        data: PathBuf,
    },

    /// Count records whose field equals a value
    CountEquals {
        /// JSON-lines file of records
        #[arg(long)]
        data: PathBuf,
        #[arg(long, value_enum)]
        field: FieldArg,
        #[arg(long)]
        value: String,
        #[arg(long, value_enum, default_value_t = LayoutArg::Column)]
        layout: LayoutArg,
    },

    /// Minimum, maximum or sum of a numeric field
    Aggregate {
        /// JSON-lines file of records
        #[arg(long)]
        data: PathBuf,
        #[arg(long, value_enum)]
        field: FieldArg,
        #[arg(long, value_enum)]
        op: AggregateOp,
        #[arg(long, value_enum, default_value_t = LayoutArg::Column)]
        layout: LayoutArg,
    },

    /// Print records whose field equals a value, one JSON object per line
    Filter {
        /// JSON-lines file of records
        #[arg(long)]
        data: PathBuf,
        #[arg(long, value_enum)]
        field: FieldArg,
        #[arg(long)]
        value: String,
        #[arg(long, value_enum, default_value_t = LayoutArg::Column)]
        layout: LayoutArg,
    },
}

/// Record field named on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldArg {
    Symbol,
    Date,
    High,
    Low,
    Open,
    Close,
    CloseAdjusted,
    Volume,
    SplitCoefficient,
}

impl From<FieldArg> for FieldId {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Symbol => FieldId::Symbol,
            FieldArg::Date => FieldId::Date,
            FieldArg::High => FieldId::High,
            FieldArg::Low => FieldId::Low,
            FieldArg::Open => FieldId::Open,
            FieldArg::Close => FieldId::Close,
            FieldArg::CloseAdjusted => FieldId::CloseAdjusted,
            FieldArg::Volume => FieldId::Volume,
            FieldArg::SplitCoefficient => FieldId::SplitCoefficient,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    Row,
    Column,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Row => Layout::Row,
            LayoutArg::Column => Layout::Column,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Min,
    Max,
    Sum,
}

impl AggregateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Sum => "sum",
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
