//! Branches (§3, §4.1 `create_branch`).

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::thread::Thread;

/// A fork of a thread at a given message, with its own independent
/// `Thread` state. Branches never share mutable state with their parent
/// past the fork point (§4.1 invariant) — `create_branch` deep-copies the
/// parent's thread rather than keeping a reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub parent_thread_id: String,
    pub forked_from_message_id: String,
    pub created_at: DateTime<Utc>,
    pub thread: Thread,
}

impl Branch {
    pub fn new(
        id: impl Into<String>,
        parent_thread_id: impl Into<String>,
        forked_from_message_id: impl Into<String>,
        thread: Thread,
    ) -> Self {
        Self {
            id: id.into(),
            parent_thread_id: parent_thread_id.into(),
            forked_from_message_id: forked_from_message_id.into(),
            created_at: Utc::now(),
            thread,
        }
    }
}

#[cfg(test)]
#[path = "branch.test.rs"]
mod tests;
