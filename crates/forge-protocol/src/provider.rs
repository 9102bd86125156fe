//! Inbound surface of the `stream_chat` seam (§6).
//!
//! This models only the events a provider adapter hands back to the
//! agent loop and the parameters it is given — not any concrete
//! provider's wire format, which is explicitly out of scope.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// A single chat message as sent to a provider, already assembled by
/// the message assembler (C2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ChatToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// A tool call as embedded in an assembled assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// A tool specification offered to the provider alongside the message
/// list, mirroring [`crate::tool_descriptor::ToolDescriptor`] but
/// reduced to what a provider request needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpecification {
    pub name: String,
    pub description: String,
    pub parameters_schema: Value,
}

/// Sampling and shaping parameters for one request (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestParameters {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Token usage reported by a provider at the end of a turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// One event a provider adapter yields from its inbound stream. The
/// agent loop consumes these to drive its streaming/dispatching states
/// (§4.4); nothing here is specific to any one provider's transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmStreamEvent {
    TextDelta { delta: String },
    ReasoningDelta { delta: String },
    ToolCallFragment { id: String, name: Option<String>, arguments_delta: String },
    ToolCallComplete { id: String, name: String, arguments: Value },
    Usage { usage: Usage },
    Done,
    Error { message: String, retryable: bool },
}

#[cfg(test)]
#[path = "provider.test.rs"]
mod tests;
