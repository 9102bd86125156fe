//! Outbound events the engine emits to its host/UI (§6).
//!
//! These are the coalesced, ordered events the streaming buffer (C7)
//! flushes downstream — distinct from the raw per-token events a
//! provider adapter emits inbound (see [`crate::provider`]).

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::compression::CompressionStats;
use crate::message::ToolResultType;

/// A single outbound notification about a thread's state (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThreadEvent {
    TextDelta {
        message_id: String,
        delta: String,
    },
    ReasoningDelta {
        message_id: String,
        delta: String,
    },
    ToolCallStarted {
        message_id: String,
        tool_call_id: String,
        name: String,
    },
    ToolCallArgumentsDelta {
        tool_call_id: String,
        delta: String,
    },
    ToolCallCompleted {
        tool_call_id: String,
        arguments: Value,
    },
    ToolResult {
        tool_call_id: String,
        result_type: ToolResultType,
        content: String,
    },
    ApprovalRequired {
        tool_call_id: String,
        name: String,
    },
    MessageFinalized {
        message_id: String,
    },
    Compacted {
        stats: CompressionStats,
    },
    Error {
        status_code: i32,
        message: String,
    },
    TurnComplete,
    Cancelled,
}

#[cfg(test)]
#[path = "event.test.rs"]
mod tests;
