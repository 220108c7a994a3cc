//! CLI module for tickstore
//!
//! Loads a JSON-lines data file into both layouts, runs one query and
//! writes the result to stdout as JSON.

mod args;
mod commands;
mod errors;

pub use args::{AggregateOp, Cli, Command, FieldArg, LayoutArg};
pub use commands::{run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
