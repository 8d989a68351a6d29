//! Session clock: maps UTC time to a named trading session.
//!
//! London [06:00, 12:00), New York [12:00, 21:00), Asia otherwise.
//! Boundary hours belong to the later session. No daylight-saving adjustment.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    London,
    #[serde(rename = "New York")]
    NewYork,
    Asia,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown session name: {0:?}")]
pub struct UnknownSession(pub String);

impl Session {
    pub const ALL: [Session; 3] = [Session::London, Session::NewYork, Session::Asia];

    /// Session for an hour of the UTC day. Hours outside 0..24 wrap.
    pub fn for_hour(hour: u32) -> Self {
        match hour % 24 {
            6..=11 => Session::London,
            12..=20 => Session::NewYork,
            _ => Session::Asia,
        }
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self::for_hour(time.hour())
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Session::London => "London",
            Session::NewYork => "New York",
            Session::Asia => "Asia",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = UnknownSession;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Session::ALL
            .into_iter()
            .find(|session| session.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSession(s.to_string()))
    }
}
