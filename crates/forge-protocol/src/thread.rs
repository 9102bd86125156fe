//! The `Thread` aggregate (§3) and its streaming/compression state.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::compression::CompressionStats;
use crate::compression::HandoffDocument;
use crate::compression::StructuredSummary;
use crate::message::Message;

/// Phase of the streaming state machine a thread's in-flight turn is in
/// (§3 "StreamState", §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamPhase {
    #[default]
    Idle,
    Streaming,
    ToolPending,
    ToolRunning,
}

/// Per-phase streaming metadata. Transient: not meaningful once `phase`
/// returns to `Idle`, but kept serializable so a crashed process can
/// recover to idle on reload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamState {
    pub phase: StreamPhase,
    /// Id of the assistant message currently being streamed into, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_message_id: Option<String>,
    /// Internal hint: whether the last streamed text part has been
    /// finalized (a new tool_call part was opened after it). Per the
    /// open question in the design notes, this is treated as transient
    /// per-turn state and is not meant to survive serialization in a
    /// meaningful way beyond "assume finalized after reload".
    #[serde(default)]
    pub text_finalized: bool,
}

/// Phase of an in-progress compression run (§3 "CompressionState").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionPhase {
    #[default]
    Idle,
    Analyzing,
    Compressing,
    Summarizing,
    Done,
}

/// Compression bookkeeping for a thread (§3, §4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_stats: Option<CompressionStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_summary: Option<StructuredSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handoff_document: Option<HandoffDocument>,
    #[serde(default)]
    pub handoff_required: bool,
    #[serde(default)]
    pub is_compacting: bool,
    #[serde(default)]
    pub phase: CompressionPhase,
    /// Highest compression level (`"L0"`..`"L4"`) applied so far this
    /// turn (§4.3 "raising the level is monotonic within a turn").
    /// Stored as a string so this crate doesn't need to depend on the
    /// context manager's level enum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_level: Option<String>,
}

/// A context item pinned into the assembled request (§4.2): a file path,
/// a tool-output reference, or a symbol-listing reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextItem {
    pub id: String,
    pub path: String,
}

/// A pending objective/step set carried across a handoff (§4.3 L4, §9 open
/// question: treated as system-injected context until the next turn
/// re-establishes it explicitly).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingObjective {
    pub objective: String,
    pub steps: Vec<String>,
}

/// The unit of conversation (§3 "Thread").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub context_items: Vec<ContextItem>,
    #[serde(default)]
    pub stream_state: StreamState,
    #[serde(default)]
    pub compression_state: CompressionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handoff_context: Option<HandoffDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_objective: Option<PendingObjective>,
    /// Schema version of the serialized document, for forward-compatible
    /// readers (ambient durability concern, SPEC_FULL §3).
    #[serde(default = "schema_version_v1")]
    pub schema_version: u32,
}

fn schema_version_v1() -> u32 {
    1
}

impl Thread {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            created_at: now,
            last_modified: now,
            messages: Vec::new(),
            context_items: Vec::new(),
            stream_state: StreamState::default(),
            compression_state: CompressionState::default(),
            handoff_context: None,
            pending_objective: None,
            schema_version: 1,
        }
    }

    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    pub fn find_message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn find_message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id() == id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.id() == id)
    }
}

#[cfg(test)]
#[path = "thread.test.rs"]
mod tests;
