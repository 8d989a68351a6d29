//! Candle source trait and structured error types.
//!
//! The CandleSource trait abstracts over where candles come from (Yahoo Finance
//! in production, in-memory series in tests) so the pipeline never depends on
//! network access directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Candle;

/// Lookback window and bar interval for a fetch, in the provider's notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchRequest {
    /// Lookback window (e.g. "5d").
    pub range: String,
    /// Bar interval (e.g. "15m").
    pub interval: String,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            range: "5d".into(),
            interval: "15m".into(),
        }
    }
}

/// Structured error types for candle fetches.
///
/// Every variant means "no data for this instrument this run"; none are fatal.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("HTTP {status} for {ticker}")]
    Http { ticker: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {ticker}")]
    SymbolNotFound { ticker: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for candle sources.
///
/// An empty series is a valid answer meaning "no data this run".
pub trait CandleSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch OHLC candles for a ticker, oldest first.
    fn fetch(&self, ticker: &str, request: &FetchRequest) -> Result<Vec<Candle>, DataError>;
}
