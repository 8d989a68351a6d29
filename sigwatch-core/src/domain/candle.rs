//! Candle: one OHLC bar of an intraday series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC bar for a single instrument at a fixed interval.
///
/// Series are ordered by `timestamp`, strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: positive prices and high/low bracketing open/close.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Extract the closing prices of a series, in order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// True if timestamps are strictly increasing.
pub fn is_chronological(candles: &[Candle]) -> bool {
    candles
        .windows(2)
        .all(|pair| pair[0].timestamp < pair[1].timestamp)
}
