//! Correlation filter: suppress same-direction entries on correlated pairs.
//!
//! Partners are symmetric: linking A to B also links B to A. An instrument is
//! blocked from a direction when any partner already holds that direction in
//! the current run's open positions.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Instrument};

/// Directions taken during the current run, keyed by instrument key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPositions {
    positions: HashMap<String, Direction>,
}

impl OpenPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a direction for an instrument, replacing any earlier one.
    pub fn insert(&mut self, key: impl Into<String>, direction: Direction) {
        self.positions.insert(key.into(), direction);
    }

    pub fn get(&self, key: &str) -> Option<Direction> {
        self.positions.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationFilter {
    partners: HashMap<String, BTreeSet<String>>,
}

impl CorrelationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link two instruments in both directions. Self-links are ignored.
    pub fn link(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.partners
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.partners
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    /// Build the symmetric partner map from each instrument's `correlated_with` list.
    pub fn from_instruments<'a>(instruments: impl IntoIterator<Item = &'a Instrument>) -> Self {
        let mut filter = Self::new();
        for instrument in instruments {
            for partner in &instrument.correlated_with {
                filter.link(&instrument.key, partner);
            }
        }
        filter
    }

    /// Partners of an instrument, in sorted order.
    pub fn partners_of(&self, key: &str) -> impl Iterator<Item = &str> {
        self.partners
            .get(key)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// First partner holding `direction`, if any.
    pub fn blocking_partner(
        &self,
        key: &str,
        direction: Direction,
        open: &OpenPositions,
    ) -> Option<&str> {
        self.partners_of(key)
            .find(|partner| open.get(partner) == Some(direction))
    }

    pub fn is_blocked(&self, key: &str, direction: Direction, open: &OpenPositions) -> bool {
        self.blocking_partner(key, direction, open).is_some()
    }
}
