//! Yahoo Finance candle source.
//!
//! Fetches intraday OHLC bars from Yahoo's v8 chart API using a lookback range
//! and interval (e.g. `range=5d&interval=15m`). One request per call, no
//! retries: a failed fetch means no data for that instrument this run.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{CandleSource, DataError, FetchRequest};
use crate::domain::Candle;
use serde::Deserialize;
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct YahooSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooSource {
    pub const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com";

    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the chart API URL for a ticker, range and interval.
    fn chart_url(&self, ticker: &str, request: &FetchRequest) -> String {
        format!(
            "{}/v8/finance/chart/{ticker}?range={}&interval={}",
            self.base_url, request.range, request.interval
        )
    }

    /// Parse a chart API body into candles.
    ///
    /// Bars without a close are dropped. Missing open/high/low fall back to the
    /// close. A result with no timestamps is an empty series, not an error.
    fn parse_response(ticker: &str, resp: ChartResponse) -> Result<Vec<Candle>, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                ticker: ticker.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let Some(data) = result.into_iter().next() else {
            return Ok(Vec::new());
        };

        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut candles = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = chrono::DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            let open = quote.open.get(i).copied().flatten().unwrap_or(close);
            let high = quote.high.get(i).copied().flatten().unwrap_or(close);
            let low = quote.low.get(i).copied().flatten().unwrap_or(close);

            candles.push(Candle {
                timestamp,
                open,
                high,
                low,
                close,
            });
        }

        Ok(candles)
    }
}

impl CandleSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, ticker: &str, request: &FetchRequest) -> Result<Vec<Candle>, DataError> {
        let url = self.chart_url(ticker, request);
        tracing::debug!(%url, "fetching candles");

        let resp = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                DataError::NetworkUnreachable(format!("timeout: {e}"))
            } else {
                DataError::NetworkUnreachable(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                ticker: ticker.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                ticker: ticker.to_string(),
                status: status.as_u16(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })?;

        Self::parse_response(ticker, chart)
    }
}
