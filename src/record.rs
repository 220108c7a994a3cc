//! Market record type
//!
//! A `Record` is one logical row. Both layouts expose it: the row store keeps
//! records as-is, the column store reconstructs them on demand.

use serde::{Deserialize, Serialize};

/// Position of a row inside a store, in append order
pub type RowId = u32;

/// One market observation for a symbol on a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Ticker symbol
    pub symbol: String,
    /// Trading date, kept as an opaque key
    pub date: String,
    /// Session high
    pub high: f32,
    /// Session low
    pub low: f32,
    /// Opening price
    pub open: f32,
    /// Closing price
    pub close: f32,
    /// Close adjusted for splits and dividends
    pub close_adjusted: f32,
    /// Traded volume
    pub volume: u32,
    /// Split coefficient for the session
    pub split_coefficient: f32,
}

impl Record {
    /// Builds a record from the nine positional ingestion values
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        date: impl Into<String>,
        high: f32,
        low: f32,
        open: f32,
        close: f32,
        close_adjusted: f32,
        volume: u32,
        split_coefficient: f32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date: date.into(),
            high,
            low,
            open,
            close,
            close_adjusted,
            volume,
            split_coefficient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_positional_order() {
        let r = Record::new("AAA", "2020-01-01", 10.0, 9.0, 9.5, 9.8, 9.7, 100, 1.0);
        assert_eq!(r.symbol, "AAA");
        assert_eq!(r.date, "2020-01-01");
        assert_eq!(r.high, 10.0);
        assert_eq!(r.low, 9.0);
        assert_eq!(r.open, 9.5);
        assert_eq!(r.close, 9.8);
        assert_eq!(r.close_adjusted, 9.7);
        assert_eq!(r.volume, 100);
        assert_eq!(r.split_coefficient, 1.0);
    }

    #[test]
    fn test_serde_field_names() {
        let r = Record::new("AAA", "2020-01-01", 1.0, 1.0, 1.0, 1.0, 1.0, 5, 1.0);
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["symbol"], "AAA");
        assert_eq!(value["close_adjusted"], 1.0);
        assert_eq!(value["split_coefficient"], 1.0);

        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_negative_values_accepted() {
        let r = Record::new("AAA", "", -1.0, -2.0, 0.0, 0.0, 0.0, 0, -3.0);
        assert_eq!(r.high, -1.0);
        assert!(r.date.is_empty());
    }
}
