//! Session dedup store: remembers which session each key was last alerted in.
//!
//! On disk this is a flat JSON object of key → session name. Per-instrument
//! mode keys by instrument (`{"GOLD": "London", "BTCUSD": "Asia"}`); global mode
//! uses the single key `"session"` (`{"session": "London"}`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sigwatch_core::Session;

use super::{load_json, save_json, StateError};

/// Granularity of the dedup gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupScope {
    /// Each instrument is alerted at most once per session.
    ///
    /// Open positions only live for one run, so an instrument skipped here
    /// does not block its correlated partners. GOLD alerted at 09:15 leaves
    /// USDJPY free to alert the same direction at 09:30.
    #[default]
    PerInstrument,
    /// The whole run is skipped once any run completed in this session.
    Global,
}

impl DedupScope {
    /// Key used in global mode.
    pub const GLOBAL_KEY: &'static str = "session";

    /// Store key for an instrument under this scope.
    pub fn key_for<'a>(&self, instrument_key: &'a str) -> &'a str {
        match self {
            DedupScope::PerInstrument => instrument_key,
            DedupScope::Global => Self::GLOBAL_KEY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionDedupStore {
    path: PathBuf,
    record: BTreeMap<String, Session>,
}

impl SessionDedupStore {
    /// Open the store at `path`. A missing or corrupt file is an empty record.
    ///
    /// An unknown session name anywhere in the file makes the whole file corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = load_json(&path);
        Self { path, record }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff `key` was last alerted in `session`.
    pub fn already_alerted(&self, key: &str, session: Session) -> bool {
        self.record.get(key) == Some(&session)
    }

    pub fn last_session(&self, key: &str) -> Option<Session> {
        self.record.get(key).copied()
    }

    /// Mark `key` as alerted in `session`. Other keys are left untouched.
    pub fn record(&mut self, key: &str, session: Session) {
        self.record.insert(key.to_string(), session);
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Write the merged record back to disk.
    pub fn save(&self) -> Result<(), StateError> {
        save_json(&self.path, &self.record)
    }
}
