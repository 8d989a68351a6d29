//! Risk manager: stop-loss, take-profit and per-trade risk for a signal.
//!
//! stop = entry * (1 - s) for Buy, entry * (1 + s) for Sell
//! take-profit = entry + (entry - stop) * R for Buy, entry - (stop - entry) * R for Sell
//! Risk is reduced after a losing streak; stop and take-profit are unaffected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Direction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    /// Stop distance from entry, in percent.
    pub stop_distance_pct: f64,
    /// Take-profit distance as a multiple of the stop distance.
    pub reward_multiple: f64,
    /// Consecutive losses at which risk is reduced.
    pub reduce_after_losses: u32,
    /// Factor applied to base risk in reduced mode.
    pub reduction_factor: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            stop_distance_pct: 0.2,
            reward_multiple: 1.7,
            reduce_after_losses: 2,
            reduction_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionMode {
    Normal,
    Reduced,
}

impl fmt::Display for PositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionMode::Normal => write!(f, "Normal"),
            PositionMode::Reduced => write!(f, "Reduced"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub entry: f64,
    pub direction: Direction,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_pct: f64,
    pub mode: PositionMode,
}

#[derive(Debug, Clone, Default)]
pub struct RiskManager {
    params: RiskParams,
}

impl RiskManager {
    pub fn new(params: RiskParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RiskParams {
        &self.params
    }

    pub fn mode_for(&self, streak_loss: u32) -> PositionMode {
        if streak_loss >= self.params.reduce_after_losses {
            PositionMode::Reduced
        } else {
            PositionMode::Normal
        }
    }

    pub fn compute_trade_plan(
        &self,
        entry: f64,
        direction: Direction,
        base_risk_pct: f64,
        streak_loss: u32,
    ) -> TradePlan {
        let s = self.params.stop_distance_pct / 100.0;
        let r = self.params.reward_multiple;

        let (stop_loss, take_profit) = match direction {
            Direction::Buy => {
                let stop = entry * (1.0 - s);
                (stop, entry + (entry - stop) * r)
            }
            Direction::Sell => {
                let stop = entry * (1.0 + s);
                (stop, entry - (stop - entry) * r)
            }
        };

        let mode = self.mode_for(streak_loss);
        let risk_pct = match mode {
            PositionMode::Normal => base_risk_pct,
            PositionMode::Reduced => base_risk_pct * self.params.reduction_factor,
        };

        TradePlan {
            entry,
            direction,
            stop_loss,
            take_profit,
            risk_pct,
            mode,
        }
    }
}
