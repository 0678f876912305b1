//! Durable snapshot of a session for crash recovery.
//!
//! The checkpoint is a single pretty-printed JSON file holding the complete
//! `SessionState`. It is written once when a session is interrupted and
//! cleared once after a completed session has been reported. A corrupt file
//! is surfaced as [`CheckpointLoad::Corrupt`] so callers can warn and fall
//! back to a fresh session; write failures are propagated, since losing the
//! recovery snapshot silently would defeat its purpose.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::SessionState;

pub const CHECKPOINT_FILE: &str = "checkpoint.json";

/// Outcome of a checkpoint read.
#[derive(Debug)]
pub enum CheckpointLoad {
    Restored(SessionState),
    Absent,
    /// The file exists but does not parse; the message describes why.
    Corrupt(String),
}

#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Checkpoint living in the standard location inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CHECKPOINT_FILE))
    }

    /// Writes a snapshot of `state`, replacing any prior checkpoint.
    pub fn save(&self, state: &SessionState) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create checkpoint directory {:?}", parent))?;
        }
        let data = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write checkpoint {:?}", self.path))?;
        Ok(self.path.clone())
    }

    /// Reads the snapshot back, distinguishing a missing file from a
    /// corrupt one.
    pub fn load(&self) -> Result<CheckpointLoad> {
        if !self.path.exists() {
            return Ok(CheckpointLoad::Absent);
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read checkpoint {:?}", self.path))?;
        match serde_json::from_str(&data) {
            Ok(state) => Ok(CheckpointLoad::Restored(state)),
            Err(err) => Ok(CheckpointLoad::Corrupt(format!(
                "checkpoint {:?} is not readable: {err}",
                self.path
            ))),
        }
    }

    /// Removes the checkpoint if present.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove checkpoint {:?}", self.path))?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
