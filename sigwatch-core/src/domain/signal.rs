//! Signal: directional output of one evaluation run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction of an actionable signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// Result of signal generation.
///
/// `None` means no actionable edge this run. It is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    None,
}

impl Signal {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Signal::Buy => Some(Direction::Buy),
            Signal::Sell => Some(Direction::Sell),
            Signal::None => None,
        }
    }

    pub fn is_directional(&self) -> bool {
        self.direction().is_some()
    }
}

impl From<Direction> for Signal {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Buy => Signal::Buy,
            Direction::Sell => Signal::Sell,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::None => write!(f, "NONE"),
        }
    }
}
