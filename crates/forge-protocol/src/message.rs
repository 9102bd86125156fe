//! The tagged-variant message model (§3 "Message").
//!
//! Per the re-architecture hint "Prototype/class-based store → tagged
//! variant over messages", there is exactly one `Message` enum with four
//! kinds (`user`, `assistant`, `tool`, `checkpoint`) rather than a class
//! hierarchy. Messages never hold parent pointers; cross-references (a
//! `tool` message to its `assistant.tool_call`, a `checkpoint` to the
//! message it protects) are by id only, per the "arena + index" hint.

use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::snapshot::FileSnapshot;

/// A single user-supplied content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserContentPart {
    Text { text: String },
    Image { url: String, media_type: String },
}

/// The content of a `user` message: either plain text or an ordered list
/// of text/image parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserContent {
    Text(String),
    Parts(Vec<UserContentPart>),
}

impl UserContent {
    /// Flattened plain-text view, used for token estimation and for
    /// providers that only accept a string.
    pub fn as_text(&self) -> String {
        match self {
            UserContent::Text(s) => s.clone(),
            UserContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    UserContentPart::Text { text } => Some(text.clone()),
                    UserContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One part of an assistant message's ordered `parts` list.
///
/// The order of this vector is the order the UI must render, and
/// `tool_call` parts must come after all text/reasoning they stream-follow
/// (§3 invariants).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssistantPart {
    Text { text: String },
    Reasoning { text: String },
    ToolCall { tool_call: ToolCallPart },
}

/// A tool call as it appears inline in `assistant.parts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallPart {
    pub id: String,
    pub name: String,
    /// Raw, possibly-still-assembling JSON arguments. Incremental during
    /// streaming (§4.4 "tool_call fragment"); complete once finalized.
    pub arguments: Value,
    /// Compact summary retained by L2 compression in place of the full
    /// arguments (§4.3).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params_summary: Option<String>,
}

/// A patch applied to an in-flight tool call via
/// `update_tool_call` (§4.1). `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ToolCallPatch {
    pub name: Option<String>,
    pub arguments: Option<Value>,
}

/// Outcome of a tool invocation, mirrored on the `tool` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolResultType {
    InvalidParams,
    Running,
    Success,
    Error,
    Rejected,
}

impl ToolResultType {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ToolResultType::Running)
    }
}

/// The kind of checkpoint (§3 "checkpoint").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    UserMessage,
    ToolEdit,
}

/// A single message in a thread.
///
/// All four variants share `id` and `created_at` so the store can order
/// and reference them uniformly; variant-specific fields are nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    User {
        id: String,
        created_at: DateTime<Utc>,
        content: UserContent,
        /// Snapshot of pinned context items used at send time.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        context_items: Vec<String>,
    },
    Assistant {
        id: String,
        created_at: DateTime<Utc>,
        /// Flattened text for simple consumers.
        content: String,
        parts: Vec<AssistantPart>,
        /// Parallel index into `parts` of type `tool_call`.
        #[serde(default)]
        tool_calls: Vec<usize>,
        /// Timestamp marking an earlier compression boundary.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        compacted_at: Option<DateTime<Utc>>,
    },
    Tool {
        id: String,
        created_at: DateTime<Utc>,
        tool_call_id: String,
        name: String,
        content: String,
        #[serde(rename = "type")]
        result_type: ToolResultType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        compacted_at: Option<DateTime<Utc>>,
    },
    Checkpoint {
        id: String,
        created_at: DateTime<Utc>,
        #[serde(rename = "type")]
        kind: CheckpointKind,
        snapshots: HashMap<String, FileSnapshot>,
    },
}

impl Message {
    pub fn id(&self) -> &str {
        match self {
            Message::User { id, .. } => id,
            Message::Assistant { id, .. } => id,
            Message::Tool { id, .. } => id,
            Message::Checkpoint { id, .. } => id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Message::User { created_at, .. } => *created_at,
            Message::Assistant { created_at, .. } => *created_at,
            Message::Tool { created_at, .. } => *created_at,
            Message::Checkpoint { created_at, .. } => *created_at,
        }
    }

    pub fn as_assistant(&self) -> Option<(&str, &[AssistantPart])> {
        match self {
            Message::Assistant { id, parts, .. } => Some((id, parts)),
            _ => None,
        }
    }

    pub fn is_compacted(&self) -> bool {
        match self {
            Message::Assistant { compacted_at, .. } => compacted_at.is_some(),
            Message::Tool { compacted_at, .. } => compacted_at.is_some(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "message.test.rs"]
mod tests;
