//! Sigwatch Core: domain types, indicators, signal engine, correlation and risk.
//!
//! This crate contains the pure decision logic of the signal evaluator:
//! - Domain types (candles, instruments, signals)
//! - Session clock mapping UTC hours to trading sessions
//! - EWMA and momentum-ratio indicators
//! - EWMA crossover signal engine with class-dependent confirmation
//! - Correlation filter over the run's open positions
//! - Risk manager producing stop-loss / take-profit plans
//! - Candle source trait and the Yahoo Finance adapter

pub mod correlation;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod risk;
pub mod session;
pub mod signal;

pub use correlation::{CorrelationFilter, OpenPositions};
pub use risk::{PositionMode, RiskManager, RiskParams, TradePlan};
pub use session::Session;
pub use signal::{generate_signal, SignalEngine, SignalError, SignalEvaluation, SignalParams};
