//! Append-only session event log.
//!
//! Every state-changing moment of a session is recorded as one JSON line in
//! `events.jsonl` under the sessions directory, so a run can be audited
//! after the fact without replaying it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const EVENTS_FILE: &str = "events.jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    QuestionsGenerated,
    QuestionAsked,
    AnswerEvaluated,
    ReasoningDegraded,
    CheckpointSaved,
    CheckpointRestored,
    SessionCompleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub event_id: Uuid,
    pub session_id: Uuid,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Writer handle for the session event log.
#[derive(Debug, Clone)]
pub struct SessionLog {
    events_path: PathBuf,
}

impl SessionLog {
    pub fn for_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            events_path: dir.as_ref().join(EVENTS_FILE),
        }
    }

    pub fn record(
        &self,
        session_id: Uuid,
        event_type: EventType,
        details: serde_json::Value,
    ) -> Result<Uuid> {
        let event = SessionEvent {
            event_id: Uuid::new_v4(),
            session_id,
            event_type,
            timestamp: Utc::now(),
            details,
        };
        self.append_event(&event)?;
        Ok(event.event_id)
    }

    pub fn append_event(&self, event: &SessionEvent) -> Result<()> {
        if let Some(parent) = self.events_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)?;
        file.write_all(serde_json::to_string(event)?.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Loads all recorded events, oldest first.
    pub fn load_events(&self) -> Result<Vec<SessionEvent>> {
        if !self.events_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.events_path)?;
        let mut events = Vec::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            events.push(serde_json::from_str(line)?);
        }
        Ok(events)
    }

    pub fn path(&self) -> &Path {
        &self.events_path
    }
}
