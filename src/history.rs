//! Action history - append-only log of applied mutations
//!
//! Owned by the workspace as a side-log; consulted only to resolve deictic
//! references ("delete that") to the most recent created target. This is
//! not an undo stack: entries can be removed by id or target, but there is
//! no inverse-operation replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    FileCreated,
    FolderCreated,
    FunctionAdded,
    CodeModified,
}

impl ActionKind {
    /// Create-type entries are the ones a deictic delete may target.
    pub fn is_create(self) -> bool {
        matches!(self, ActionKind::FileCreated | ActionKind::FolderCreated)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    pub id: String,
    pub kind: ActionKind,
    /// Name of the node or function the mutation touched.
    pub target: String,
    pub timestamp: DateTime<Utc>,
    /// Free-form payload for replay/explanation.
    pub details: JsonValue,
}

#[derive(Debug, Default)]
pub struct ActionHistory {
    entries: Vec<ActionEntry>,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Entries are immutable once recorded.
    pub fn record(&mut self, kind: ActionKind, target: impl Into<String>, details: JsonValue) -> &ActionEntry {
        self.entries.push(ActionEntry {
            id: Uuid::new_v4().to_string(),
            kind,
            target: target.into(),
            timestamp: Utc::now(),
            details,
        });
        self.entries.last().unwrap()
    }

    /// The most recent entry, but only if it is a create-type action.
    /// Deictic deletes look at the last entry specifically, not backwards
    /// through the log.
    pub fn last_created(&self) -> Option<&ActionEntry> {
        self.entries.last().filter(|e| e.kind.is_create())
    }

    /// Remove entries matching an id or target name. Used when an undo
    /// command consumes an entry.
    pub fn remove(&mut self, target_or_id: &str) {
        self.entries.retain(|e| e.id != target_or_id && e.target != target_or_id);
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
