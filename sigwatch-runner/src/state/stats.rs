//! Running trade statistics.
//!
//! The pipeline only reads `streak_loss`. The rest is bookkeeping fed by
//! `stats record` and consumed by the equity export.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{load_json, save_json, try_load_json, StateError};

pub const STARTING_BALANCE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    pub balance: f64,
    pub wins: u32,
    pub losses: u32,
    /// Consecutive losing trades; reset by a win.
    pub streak_loss: u32,
    /// Balance after each closed trade, starting with the initial balance.
    pub equity: Vec<f64>,
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self {
            balance: STARTING_BALANCE,
            wins: 0,
            losses: 0,
            streak_loss: 0,
            equity: vec![STARTING_BALANCE],
        }
    }
}

impl StatsRecord {
    /// Apply a closed trade's profit or loss.
    ///
    /// A zero result is breakeven: balance and equity move, counters do not.
    pub fn apply_trade(&mut self, pnl: f64) {
        self.balance += pnl;
        if pnl > 0.0 {
            self.wins += 1;
            self.streak_loss = 0;
        } else if pnl < 0.0 {
            self.losses += 1;
            self.streak_loss += 1;
        }
        self.equity.push(self.balance);
    }

    pub fn trades(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win rate in percent, `None` before the first decided trade.
    pub fn win_rate(&self) -> Option<f64> {
        match self.trades() {
            0 => None,
            n => Some(self.wins as f64 / n as f64 * 100.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, or the first-run default if missing or corrupt.
    pub fn load(&self) -> StatsRecord {
        load_json(&self.path)
    }

    /// Load the record, failing on anything but a missing file.
    pub fn try_load(&self) -> Result<StatsRecord, StateError> {
        try_load_json(&self.path)
    }

    pub fn save(&self, record: &StatsRecord) -> Result<(), StateError> {
        save_json(&self.path, record)
    }

    /// Apply a closed trade and persist it. A corrupt file is left untouched.
    pub fn record_trade(&self, pnl: f64) -> Result<StatsRecord, StateError> {
        let mut record = self.try_load()?;
        record.apply_trade(pnl);
        self.save(&record)?;
        Ok(record)
    }
}
