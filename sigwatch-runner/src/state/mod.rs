//! Persisted run state: JSON save/load across invocations.
//!
//! Reads fail open: a missing, unreadable or corrupt file yields the default
//! value and a warning. Read-modify-write paths use the strict loader instead,
//! so a corrupt file is reported rather than overwritten. Writes create parent
//! directories and report errors.

pub mod dedup;
pub mod stats;

pub use dedup::{DedupScope, SessionDedupStore};
pub use stats::{StatsRecord, StatsStore};

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt state file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load a JSON state file. Returns defaults if the file is missing or corrupt.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no state file yet, starting empty");
            return T::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "state file unreadable, starting empty");
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "state file corrupt, starting empty");
            T::default()
        }
    }
}

/// Load a JSON state file strictly. Only a missing file yields the default.
pub fn try_load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StateError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StateError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&content).map_err(|source| StateError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a JSON state file. Creates parent directories if needed.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StateError> {
    let io_err = |source| StateError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(io_err)?;
    Ok(())
}
