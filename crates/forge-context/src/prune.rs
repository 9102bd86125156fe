//! L1 pruning (§4.3 "L1 Prune"): mark old tool results as compacted so
//! the assembler (C2) replaces their content with a placeholder. The
//! store keeps the messages; only `compacted_at` is set, so a later
//! rollback or re-read of the raw thread still sees the original
//! content if it's ever needed for debugging.

use chrono::Utc;

use forge_config::ContextConfig;
use forge_protocol::Message;

use crate::estimator::estimate_tokens_str;

/// Tool names L1 never prunes regardless of age (§4.3 "protected
/// tools"): these carry state the model needs to see verbatim on every
/// turn (the live plan, a pending user question).
pub const PROTECTED_TOOLS: &[&str] = &["ask_user", "update_plan"];

/// Outcome of one [`prune`] pass.
#[derive(Debug, Clone, Default)]
pub struct PruneOutcome {
    pub pruned_message_ids: Vec<String>,
    pub tokens_reclaimed: u32,
}

impl PruneOutcome {
    pub fn is_empty(&self) -> bool {
        self.pruned_message_ids.is_empty()
    }
}

/// Index of the first message belonging to the `keep_recent_turns`-th
/// most recent turn, where a turn starts at a `user` message. Messages
/// at or after this index are never pruned. Returns `0` (protect
/// everything) if the thread has fewer turns than the keep window.
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

/// Run L1 pruning over `messages` in place. Returns the set of
/// newly-compacted tool messages, or an empty outcome if the pruning
/// guards (§4.3) were not satisfied.
pub fn prune(messages: &mut [Message], config: &ContextConfig) -> PruneOutcome {
    let boundary = recent_turns_boundary(messages, config.keep_recent_turns);

    // Candidate tool messages: before the recent-turns boundary, not
    // already compacted, not a protected tool, and terminal (a still-
    // running tool result can't be summarized away).
    let mut candidates: Vec<usize> = Vec::new();
    for (idx, message) in messages.iter().enumerate().take(boundary) {
        let Message::Tool { name, result_type, compacted_at, .. } = message else {
            // An assistant message already carrying `compacted_at` marks
            // the boundary of an earlier L2/L3 compression pass (§4.3
            // "preserve the fork boundary"). Everything at or before it
            // was already folded away; only tool results newer than the
            // marker are still live candidates, so the walk resets
            // rather than carrying earlier candidates across it.
            if let Message::Assistant { compacted_at: Some(_), .. } = message {
                candidates.clear();
            }
            continue;
        };
        if compacted_at.is_some() {
            continue;
        }
        if !result_type.is_terminal() {
            continue;
        }
        if PROTECTED_TOOLS.contains(&name.as_str()) {
            continue;
        }
        candidates.push(idx);
    }

    // Protect the most recent `prune_protect_tokens` worth of tool
    // output among the candidates, walking from the newest candidate
    // backward.
    let mut protected_so_far = 0u32;
    let mut prunable: Vec<usize> = Vec::new();
    for &idx in candidates.iter().rev() {
        let Message::Tool { content, .. } = &messages[idx] else { unreachable!() };
        let tokens = estimate_tokens_str(content);
        if protected_so_far < config.prune_protect_tokens {
            protected_so_far += tokens;
            continue;
        }
        prunable.push(idx);
    }
    prunable.reverse();

    let reclaimable: u32 = prunable
        .iter()
        .map(|&idx| {
            let Message::Tool { content, .. } = &messages[idx] else { unreachable!() };
            estimate_tokens_str(content)
        })
        .sum();

    if reclaimable < config.prune_minimum_tokens {
        return PruneOutcome::default();
    }

    let mut outcome = PruneOutcome::default();
    let now = Utc::now();
    for idx in prunable {
        if let Message::Tool { id, content, compacted_at, .. } = &mut messages[idx] {
            outcome.tokens_reclaimed += estimate_tokens_str(content);
            outcome.pruned_message_ids.push(id.clone());
            *compacted_at = Some(now);
        }
    }
    outcome
}

#[cfg(test)]
#[path = "prune.test.rs"]
mod tests;
