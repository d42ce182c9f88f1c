//! Save/load gateway for game snapshots.
//!
//! Snapshots are stored as JSON documents. Saves go through a temp file and
//! a rename, so a failed save never corrupts an existing file.

use std::fmt;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::game::{Phase, Snapshot, SnapshotError};

/// Persistence failures, split so the shell can word its messages: the
/// first three are data-access problems, `FinishedGame` is a state problem.
#[derive(Debug)]
pub enum DataAccessError {
    /// Path, permission, or other I/O failure.
    Io(io::Error),
    /// The file is not a well-formed snapshot document.
    Format(serde_json::Error),
    /// Well-formed JSON that does not describe a resumable session.
    Invalid(SnapshotError),
    /// A finished game cannot be saved.
    FinishedGame,
}

impl fmt::Display for DataAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataAccessError::Io(err) => write!(f, "file access failed: {err}"),
            DataAccessError::Format(err) => write!(f, "not a valid save file: {err}"),
            DataAccessError::Invalid(err) => write!(f, "not a valid save file: {err}"),
            DataAccessError::FinishedGame => write!(f, "a finished game cannot be saved"),
        }
    }
}

impl std::error::Error for DataAccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataAccessError::Io(err) => Some(err),
            DataAccessError::Format(err) => Some(err),
            DataAccessError::Invalid(err) => Some(err),
            DataAccessError::FinishedGame => None,
        }
    }
}

impl From<io::Error> for DataAccessError {
    fn from(err: io::Error) -> Self {
        DataAccessError::Io(err)
    }
}

impl From<serde_json::Error> for DataAccessError {
    fn from(err: serde_json::Error) -> Self {
        DataAccessError::Format(err)
    }
}

/// Write a snapshot to `path`. Rejects terminated sessions before touching
/// the filesystem.
pub async fn save_game(path: &Path, snapshot: &Snapshot) -> Result<(), DataAccessError> {
    if snapshot.phase == Phase::GameOver {
        return Err(DataAccessError::FinishedGame);
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    info!("saved game to {}", path.display());
    Ok(())
}

/// Read and validate a snapshot from `path`. The caller applies it to the
/// engine; nothing here mutates live state.
pub async fn load_game(path: &Path) -> Result<Snapshot, DataAccessError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let snapshot: Snapshot = serde_json::from_str(&raw)?;
    if let Err(err) = snapshot.validate() {
        warn!("rejecting snapshot from {}: {err}", path.display());
        return Err(DataAccessError::Invalid(err));
    }
    info!("loaded game from {}", path.display());
    Ok(snapshot)
}
