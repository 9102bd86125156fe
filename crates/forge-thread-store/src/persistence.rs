//! Per-workspace JSON persistence (§6 "Persisted state (per
//! workspace)"). One document per workspace root, written atomically
//! (write to a sibling temp file, then rename) so a crash mid-write
//! never leaves a half-written document behind.
//!
//! Versioned: [`Thread::schema_version`] lets a future reader detect an
//! older document shape; unknown top-level fields are ignored rather
//! than rejected, per the spec's "forward-compatible readers ignore
//! unknown fields".

use std::collections::HashMap;
use std::path::Path;

use forge_protocol::Branch;
use forge_protocol::CompressionStats;
use forge_protocol::PendingChange;
use forge_protocol::Thread;
use serde::Deserialize;
use serde::Serialize;
use snafu::ResultExt;

use crate::error::PersistParseSnafu;
use crate::error::PersistReadSnafu;
use crate::error::PersistSerializeSnafu;
use crate::error::PersistWriteSnafu;
use crate::error::Result;

/// Name of the per-workspace state file, sibling to `forge.toml`.
pub const STATE_FILE_NAME: &str = "forge_state.json";

/// Current document schema version. Bump when the top-level shape
/// changes in a way an old reader couldn't tolerate via `#[serde(default)]`.
pub const DOCUMENT_SCHEMA_VERSION: u32 = 1;

/// The exact shape named in §6: threads, branches, and the indices a
/// fresh process needs to resume without replaying any engine logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub threads: HashMap<String, Thread>,
    #[serde(default)]
    pub current_thread_id: Option<String>,
    #[serde(default)]
    pub branches: HashMap<String, Branch>,
    #[serde(default)]
    pub active_branch_id: Option<String>,
    /// Rebuilt from each thread's checkpoint messages on every save;
    /// kept only so an external reader doesn't need to walk every
    /// thread's message list to find them (§9 open question: the
    /// message is authoritative, this is a derived index).
    #[serde(default)]
    pub message_checkpoints: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub compression_stats: HashMap<String, CompressionStats>,
    /// Mirrored from each thread's tool results at save time; the
    /// message on the originating tool result remains authoritative
    /// (§3 "Ownership" — this index is rebuilt on load, never read
    /// back into a thread).
    #[serde(default)]
    pub pending_changes: HashMap<String, PendingChange>,
}

fn default_schema_version() -> u32 {
    DOCUMENT_SCHEMA_VERSION
}

impl WorkspaceDocument {
    pub fn new() -> Self {
        Self {
            schema_version: DOCUMENT_SCHEMA_VERSION,
            threads: HashMap::new(),
            current_thread_id: None,
            branches: HashMap::new(),
            active_branch_id: None,
            message_checkpoints: HashMap::new(),
            compression_stats: HashMap::new(),
            pending_changes: HashMap::new(),
        }
    }

    /// Derive the checkpoint index from a thread's own messages: every
    /// `Checkpoint` message id, in thread order.
    pub fn checkpoint_ids_for(thread: &Thread) -> Vec<String> {
        thread
            .messages
            .iter()
            .filter_map(|m| match m {
                forge_protocol::Message::Checkpoint { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context(PersistSerializeSnafu)
    }

    pub fn from_json(contents: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(contents).context(PersistParseSnafu { path: path.display().to_string() })
    }

    /// Write to `path` via a sibling temp file + rename, so readers
    /// never observe a partially-written document.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .context(PersistWriteSnafu { path: tmp_path.display().to_string() })?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .context(PersistWriteSnafu { path: path.display().to_string() })?;
        Ok(())
    }

    /// Load from `path`. A missing file is not an error: the caller
    /// gets a fresh, empty document and the workspace starts cold.
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(Self::new());
        }
        let contents = tokio::fs::read_to_string(path)
            .await
            .context(PersistReadSnafu { path: path.display().to_string() })?;
        Self::from_json(&contents, path)
    }
}

impl Default for WorkspaceDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "persistence.test.rs"]
mod tests;
