//! Signal engine: EWMA crossover with class-dependent confirmation.
//!
//! The engine is a pure function of the candle series and the instrument
//! class: identical input always yields an identical evaluation. It never sees
//! run state (open positions, stats, sessions); those are applied downstream.

pub mod confirmation;
pub mod crossover;

pub use confirmation::{FilterVerdict, MomentumConfirmation, NoFilter, SignalFilter};
pub use crossover::{crossover_signal, CrossoverReading, EwmaCrossover};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{closes, Candle, InstrumentClass, Signal};

/// Tunable signal parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    pub fast_span: usize,
    pub slow_span: usize,
    pub min_body_pct: f64,
    pub momentum_period: usize,
    pub buy_min_momentum: f64,
    pub sell_max_momentum: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            fast_span: 20,
            slow_span: 50,
            min_body_pct: 0.5,
            momentum_period: 14,
            buy_min_momentum: 60.0,
            sell_max_momentum: 40.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    #[error("series unusable: need at least {needed} bars, got {got}")]
    InsufficientBars { needed: usize, got: usize },

    #[error("series unusable: close at bar {index} is not a number")]
    InvalidClose { index: usize },
}

/// Everything the engine looked at, for logging and notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvaluation {
    pub fast_ewma: f64,
    pub slow_ewma: f64,
    /// Crossover signal before any filter.
    pub base: Signal,
    pub filter: String,
    pub verdict: FilterVerdict,
    /// Final signal after the filter.
    pub signal: Signal,
}

pub struct SignalEngine {
    params: SignalParams,
    crossover: EwmaCrossover,
    confirmation: MomentumConfirmation,
}

impl SignalEngine {
    pub fn new(params: SignalParams) -> Self {
        let crossover = EwmaCrossover::new(params.fast_span, params.slow_span);
        let confirmation = MomentumConfirmation::new(
            params.min_body_pct,
            params.momentum_period,
            params.buy_min_momentum,
            params.sell_max_momentum,
        );
        Self {
            params,
            crossover,
            confirmation,
        }
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    /// Minimum series length for a usable evaluation.
    pub fn min_bars(&self) -> usize {
        self.crossover.warmup_bars()
    }

    fn filter_for(&self, class: InstrumentClass) -> &dyn SignalFilter {
        if class.is_momentum_filtered() {
            &self.confirmation
        } else {
            &NoFilter
        }
    }

    pub fn evaluate(
        &self,
        candles: &[Candle],
        class: InstrumentClass,
    ) -> Result<SignalEvaluation, SignalError> {
        self.evaluate_closes(&closes(candles), class)
    }

    pub fn evaluate_closes(
        &self,
        closes: &[f64],
        class: InstrumentClass,
    ) -> Result<SignalEvaluation, SignalError> {
        if closes.len() < self.min_bars() {
            return Err(SignalError::InsufficientBars {
                needed: self.min_bars(),
                got: closes.len(),
            });
        }
        if let Some(index) = closes.iter().position(|c| c.is_nan()) {
            return Err(SignalError::InvalidClose { index });
        }

        let reading = self
            .crossover
            .evaluate(closes)
            .ok_or(SignalError::InvalidClose {
                index: closes.len() - 1,
            })?;

        let filter = self.filter_for(class);
        let verdict = filter.evaluate(reading.signal, closes);
        let signal = if verdict.is_passed() {
            reading.signal
        } else {
            Signal::None
        };

        Ok(SignalEvaluation {
            fast_ewma: reading.fast,
            slow_ewma: reading.slow,
            base: reading.signal,
            filter: filter.name().to_string(),
            verdict,
            signal,
        })
    }

    pub fn generate_signal(
        &self,
        candles: &[Candle],
        class: InstrumentClass,
    ) -> Result<Signal, SignalError> {
        self.evaluate(candles, class).map(|e| e.signal)
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(SignalParams::default())
    }
}

/// Signal for a candle series with default parameters.
pub fn generate_signal(candles: &[Candle], class: InstrumentClass) -> Result<Signal, SignalError> {
    SignalEngine::default().generate_signal(candles, class)
}
