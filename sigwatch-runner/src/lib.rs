//! Sigwatch Runner: configuration, persisted state, notices and the run-once pipeline.
//!
//! This crate builds on `sigwatch-core` to provide:
//! - TOML bot configuration with a built-in instrument table and validation
//! - Session dedup and stats stores backed by JSON files
//! - Notifier trait with Telegram and stdout adapters
//! - The per-run pipeline folding open positions through the instrument list
//! - Equity curve CSV export

pub mod config;
pub mod export;
pub mod notify;
pub mod pipeline;
pub mod state;

pub use config::{BotConfig, ConfigError, ConfigOrigin, DEFAULT_CONFIG_FILE};
pub use export::{export_equity_csv, write_equity_csv};
pub use notify::{Notifier, NotifyError, StdoutNotifier, TelegramCredentials, TelegramNotifier};
pub use pipeline::{InstrumentOutcome, InstrumentReport, Pipeline, RunReport};
pub use state::{DedupScope, SessionDedupStore, StateError, StatsRecord, StatsStore};
