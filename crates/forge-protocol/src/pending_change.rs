//! Tracked filesystem side-effects of a tool call (§3 "PendingChange",
//! §5 tool dispatcher, §9 open question: the pending-change list is the
//! authoritative source for what a checkpoint rollback must undo, not a
//! re-diff of the working tree).

use serde::Deserialize;
use serde::Serialize;

use crate::snapshot::FileSnapshot;

/// Kind of mutation a tool made to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Create,
    Modify,
    Delete,
}

/// Lifecycle status of a pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Pending,
    Applied,
    RolledBack,
}

/// A single file mutation attributable to one tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingChange {
    pub id: String,
    pub file_path: String,
    pub tool_call_id: String,
    pub tool_name: String,
    pub status: ChangeStatus,
    /// Pre-image, captured before the tool ran.
    pub snapshot: FileSnapshot,
    pub new_content: Option<String>,
    pub change_type: ChangeType,
    pub lines_added: u32,
    pub lines_removed: u32,
}

impl PendingChange {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, ChangeStatus::Pending)
    }
}

#[cfg(test)]
#[path = "pending_change.test.rs"]
mod tests;
