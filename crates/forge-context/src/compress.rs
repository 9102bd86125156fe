//! L2 compress-old (§4.3): on top of L1 pruning, old assistant messages
//! have their tool-call parts reduced to `{name, params_summary}` and
//! lose long reasoning parts that fall outside the retained window.

use forge_config::ContextConfig;
use forge_protocol::AssistantPart;
use forge_protocol::Message;

use crate::estimator::estimate_tokens_str;
use crate::prune::prune;
use crate::prune::PruneOutcome;

/// Reasoning parts shorter than this are left alone even outside the
/// retained window — only long reasoning traces are worth dropping.
const LONG_REASONING_TOKEN_THRESHOLD: u32 = 200;

/// Outcome of a combined L1+L2 pass.
#[derive(Debug, Clone, Default)]
pub struct CompressOutcome {
    pub prune: PruneOutcome,
    pub tool_calls_compacted: usize,
    pub reasoning_parts_dropped: usize,
}

fn recent_turns_boundary(messages: &[Message], keep_recent_turns: usize) -> usize {
    if keep_recent_turns == 0 {
        return messages.len();
    }
    let user_indices: Vec<usize> = messages
        .iter()
        .enumerate()
        .filter(|(_, m)| matches!(m, Message::User { .. }))
        .map(|(i, _)| i)
        .collect();
    if user_indices.len() <= keep_recent_turns {
        return 0;
    }
    user_indices[user_indices.len() - keep_recent_turns]
}

fn summarize_arguments(arguments: &serde_json::Value) -> String {
    let rendered = arguments.to_string();
    const MAX_LEN: usize = 120;
    if rendered.len() > MAX_LEN {
        format!("{}...", &rendered[..MAX_LEN])
    } else {
        rendered
    }
}

/// Run L1 pruning, then compact old assistant messages' tool-call parts
/// and drop their long-since-retained reasoning parts.
pub fn compress(messages: &mut [Message], config: &ContextConfig) -> CompressOutcome {
    let prune_outcome = prune(messages, config);
    let boundary = recent_turns_boundary(messages, config.keep_recent_turns);

    let mut tool_calls_compacted = 0usize;
    let mut reasoning_parts_dropped = 0usize;

    for message in messages.iter_mut().take(boundary) {
        let Message::Assistant { parts, tool_calls, compacted_at, .. } = message else {
            continue;
        };
        if compacted_at.is_some() {
            continue;
        }

        let mut new_parts = Vec::with_capacity(parts.len());
        for part in parts.drain(..) {
            match part {
                AssistantPart::ToolCall { mut tool_call } => {
                    if tool_call.params_summary.is_none() {
                        tool_call.params_summary = Some(summarize_arguments(&tool_call.arguments));
                    }
                    if !tool_call.arguments.is_null() {
                        tool_call.arguments = serde_json::Value::Null;
                        tool_calls_compacted += 1;
                    }
                    new_parts.push(AssistantPart::ToolCall { tool_call });
                }
                AssistantPart::Reasoning { text } if estimate_tokens_str(&text) > LONG_REASONING_TOKEN_THRESHOLD => {
                    reasoning_parts_dropped += 1;
                }
                other => new_parts.push(other),
            }
        }
        // Dropping reasoning parts shifts indices, so the parallel
        // `tool_calls` index (§3 invariant) is rebuilt from scratch
        // rather than patched.
        *tool_calls = new_parts
            .iter()
            .enumerate()
            .filter(|(_, p)| matches!(p, AssistantPart::ToolCall { .. }))
            .map(|(i, _)| i)
            .collect();
        *parts = new_parts;
    }

    CompressOutcome {
        prune: prune_outcome,
        tool_calls_compacted,
        reasoning_parts_dropped,
    }
}

#[cfg(test)]
#[path = "compress.test.rs"]
mod tests;
