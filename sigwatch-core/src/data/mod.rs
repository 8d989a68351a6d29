//! Candle sources

pub mod provider;
pub mod yahoo;

pub use provider::{CandleSource, DataError, FetchRequest};
pub use yahoo::YahooSource;
