//! File snapshots used by the checkpoint/branch manager (C6).

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A point-in-time capture of a single file's content.
///
/// `content: None` means the file did not exist at snapshot time — restoring
/// such a snapshot deletes the file rather than writing empty content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSnapshot {
    pub path: String,
    pub content: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl FileSnapshot {
    pub fn new(path: impl Into<String>, content: Option<String>) -> Self {
        Self {
            path: path.into(),
            content,
            timestamp: Utc::now(),
        }
    }

    /// True when the snapshot records the file's absence.
    pub fn is_absent(&self) -> bool {
        self.content.is_none()
    }
}

#[cfg(test)]
#[path = "snapshot.test.rs"]
mod tests;
