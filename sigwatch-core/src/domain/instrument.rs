use serde::{Deserialize, Serialize};
use std::fmt;

/// Instrument class tag. Decides which confirmation filters apply to a signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentClass {
    Fx,
    Crypto,
    #[default]
    Other,
}

impl InstrumentClass {
    /// Classes whose crossover signals must pass the momentum confirmation filter.
    pub fn is_momentum_filtered(&self) -> bool {
        matches!(self, InstrumentClass::Crypto)
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentClass::Fx => write!(f, "fx"),
            InstrumentClass::Crypto => write!(f, "crypto"),
            InstrumentClass::Other => write!(f, "other"),
        }
    }
}

/// One row of the instrument table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stable identifier used in notices and state files (e.g. "GOLD").
    pub key: String,
    /// Ticker understood by the candle source (e.g. "XAUUSD=X").
    pub ticker: String,
    /// Human label. Falls back to `key` when empty.
    #[serde(default)]
    pub label: String,
    /// Base risk per trade, in percent of balance.
    pub risk_pct: f64,
    #[serde(default)]
    pub class: InstrumentClass,
    /// Keys of instruments driven by the same macro factor.
    #[serde(default)]
    pub correlated_with: Vec<String>,
}

impl Instrument {
    pub fn new(key: &str, ticker: &str, risk_pct: f64, class: InstrumentClass) -> Self {
        Self {
            key: key.to_string(),
            ticker: ticker.to_string(),
            label: String::new(),
            risk_pct,
            class,
            correlated_with: Vec::new(),
        }
    }

    /// Builder-style partner declaration.
    pub fn correlated_with(mut self, partner: &str) -> Self {
        self.correlated_with.push(partner.to_string());
        self
    }

    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}
