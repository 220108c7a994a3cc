//! Row store subsystem
//!
//! Baseline layout: a `Vec<Record>` in append order, scanned for every query.

mod store;

pub use store::RowStore;
