//! Token estimation, the overflow predicate, and compression-level
//! selection (§4.3).
//!
//! The estimator is a plain character-count heuristic, not a real
//! tokenizer: `tokens = floor(len(content) / 4)`. Good enough for
//! budget decisions; never used to bill a provider.

use serde_json::Value;

use forge_protocol::AssistantPart;
use forge_protocol::Message;

const CHARS_PER_TOKEN: usize = 4;

/// Estimate tokens for a raw string (§4.3 "char-based heuristic").
pub fn estimate_tokens_str(content: &str) -> u32 {
    (content.len() / CHARS_PER_TOKEN) as u32
}

/// Estimate tokens for a JSON value by serializing it first (§4.3
/// "serialize-then-estimate for non-strings").
pub fn estimate_tokens_value(value: &Value) -> u32 {
    estimate_tokens_str(&value.to_string())
}

/// Estimate the token cost of a single message.
pub fn estimate_tokens_message(message: &Message) -> u32 {
    match message {
        Message::User { content, .. } => estimate_tokens_str(&content.as_text()),
        Message::Assistant { parts, .. } => parts
            .iter()
            .map(|part| match part {
                AssistantPart::Text { text } => estimate_tokens_str(text),
                AssistantPart::Reasoning { text } => estimate_tokens_str(text),
                AssistantPart::ToolCall { tool_call } => {
                    estimate_tokens_str(&tool_call.name) + estimate_tokens_value(&tool_call.arguments)
                }
            })
            .sum(),
        Message::Tool { content, .. } => estimate_tokens_str(content),
        // Checkpoints carry no provider-visible payload.
        Message::Checkpoint { .. } => 0,
    }
}

/// Sum token estimates over a message list (§4.3 "sum over a message
/// list"). Zero for an empty slice.
pub fn estimate_tokens_messages(messages: &[Message]) -> u32 {
    messages.iter().map(estimate_tokens_message).sum()
}

/// `is_overflow` predicate (§4.3): true once the input would leave less
/// than the output reserve (or the requested output size, whichever is
/// larger) of room in the context window.
pub fn is_overflow(input_tokens: u32, output_tokens: u32, context_limit: u32, output_reserve: u32) -> bool {
    let reserved = output_tokens.max(output_reserve);
    input_tokens > context_limit.saturating_sub(reserved)
}

/// Default output reserve used when a caller doesn't have a
/// provider-specific one (§4.3 `output_reserve=4096`).
pub const DEFAULT_OUTPUT_RESERVE: u32 = 4096;

/// The discrete compression level selected for a given input/limit
/// ratio (§4.3 "Level selection"). Ordered: `L0 < L1 < L2 < L3 < L4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompressionLevel {
    L0,
    L1,
    L2,
    L3,
    L4,
}

impl CompressionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::L0 => "L0",
            CompressionLevel::L1 => "L1",
            CompressionLevel::L2 => "L2",
            CompressionLevel::L3 => "L3",
            CompressionLevel::L4 => "L4",
        }
    }
}

/// Select the compression level for `input_tokens / context_limit`
/// (§4.3 "Level selection"). `context_limit == 0` is treated as
/// maximally overflowing (`L4`).
pub fn select_level(input_tokens: u32, context_limit: u32) -> CompressionLevel {
    if context_limit == 0 {
        return CompressionLevel::L4;
    }
    let ratio = input_tokens as f64 / context_limit as f64;
    if ratio < 0.50 {
        CompressionLevel::L0
    } else if ratio < 0.70 {
        CompressionLevel::L1
    } else if ratio < 0.85 {
        CompressionLevel::L2
    } else if ratio < 0.95 {
        CompressionLevel::L3
    } else {
        CompressionLevel::L4
    }
}

#[cfg(test)]
#[path = "estimator.test.rs"]
mod tests;
