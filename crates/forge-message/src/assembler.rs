//! Converts a thread's messages into the provider-agnostic request
//! shape (§4.2).

use forge_protocol::AssistantPart;
use forge_protocol::ChatMessage;
use forge_protocol::ChatToolCall;
use forge_protocol::Message;
use forge_protocol::Thread;
use forge_protocol::ToolDescriptor;
use forge_protocol::ToolSpecification;

use crate::expand::render_expanded_items;
use crate::expand::ExpandedItem;
use crate::system_prompt::build_system_prompt;
use crate::system_prompt::SystemPromptParts;
use crate::system_prompt::WorkspaceMetadata;

/// Placeholder substituted for a pruned/compacted tool result (§4.2).
pub const COMPACTED_TOOL_PLACEHOLDER: &str = "[Old tool result content cleared]";

/// The assembled provider request: an ordered message list plus the
/// tool schemas the model may call.
#[derive(Debug, Clone)]
pub struct AssembledRequest {
    pub messages: Vec<ChatMessage>,
    pub tool_specifications: Vec<ToolSpecification>,
}

fn index_of_latest_user_message(messages: &[Message]) -> Option<usize> {
    messages.iter().rposition(|m| matches!(m, Message::User { .. }))
}

fn assistant_text_only(parts: &[AssistantPart]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            AssistantPart::Text { text } => Some(text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn assistant_tool_calls(parts: &[AssistantPart]) -> Vec<ChatToolCall> {
    parts
        .iter()
        .filter_map(|part| match part {
            AssistantPart::ToolCall { tool_call } => Some(ChatToolCall {
                id: tool_call.id.clone(),
                name: tool_call.name.clone(),
                arguments: tool_call.arguments.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Replay one historical message into its provider-shaped form. `None`
/// for message kinds that are never provider-visible (checkpoints).
fn replay(message: &Message, expanded_user_block: Option<&str>) -> Option<ChatMessage> {
    match message {
        Message::User { content, .. } => {
            let mut text = content.as_text();
            if let Some(block) = expanded_user_block {
                if !block.is_empty() {
                    text = format!("{text}\n\n{block}");
                }
            }
            Some(ChatMessage { role: "user".to_string(), content: text, tool_calls: vec![], tool_call_id: None })
        }
        Message::Assistant { content, parts, compacted_at, .. } => {
            if compacted_at.is_some() {
                Some(ChatMessage {
                    role: "assistant".to_string(),
                    content: assistant_text_only(parts),
                    tool_calls: vec![],
                    tool_call_id: None,
                })
            } else {
                Some(ChatMessage {
                    role: "assistant".to_string(),
                    content: content.clone(),
                    tool_calls: assistant_tool_calls(parts),
                    tool_call_id: None,
                })
            }
        }
        Message::Tool { tool_call_id, content, compacted_at, .. } => {
            let rendered = if compacted_at.is_some() { COMPACTED_TOOL_PLACEHOLDER.to_string() } else { content.clone() };
            Some(ChatMessage {
                role: "tool".to_string(),
                content: rendered,
                tool_calls: vec![],
                tool_call_id: Some(tool_call_id.clone()),
            })
        }
        Message::Checkpoint { .. } => None,
    }
}

/// Assemble the full provider request for `thread`.
///
/// `expanded_items` is the already-bounded expansion of the pinned
/// context items (see [`crate::expand`]), injected inline into the
/// latest user message only (§4.2).
pub fn assemble(
    thread: &Thread,
    expanded_items: &[ExpandedItem],
    system_prompt: &SystemPromptParts<'_>,
    workspace: &WorkspaceMetadata,
    handoff_block: Option<&str>,
    tool_descriptors: &[ToolDescriptor],
) -> AssembledRequest {
    let system_content = build_system_prompt(system_prompt, workspace, handoff_block);
    let mut messages = vec![ChatMessage { role: "system".to_string(), content: system_content, tool_calls: vec![], tool_call_id: None }];

    let latest_user_idx = index_of_latest_user_message(&thread.messages);
    let expanded_block = render_expanded_items(expanded_items);

    for (idx, message) in thread.messages.iter().enumerate() {
        let expanded = if Some(idx) == latest_user_idx { Some(expanded_block.as_str()) } else { None };
        if let Some(chat_message) = replay(message, expanded) {
            messages.push(chat_message);
        }
    }

    let tool_specifications = tool_descriptors
        .iter()
        .map(|descriptor| ToolSpecification {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            parameters_schema: descriptor.parameters_schema.clone(),
        })
        .collect();

    AssembledRequest { messages, tool_specifications }
}

#[cfg(test)]
#[path = "assembler.test.rs"]
mod tests;
