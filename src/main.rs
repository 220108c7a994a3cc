//! tickstore CLI entry point
//!
//! Parsing, configuration and dispatch all live in `cli::run`. This file
//! only reports the error and sets the exit code.

use tickstore::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
