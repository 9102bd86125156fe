//! The context manager's `run` entrypoint (§4.3): estimate token usage,
//! select a compression level, and apply it in place on the thread.
//!
//! Running compression at a level at or below the thread's already-
//! `achieved_level` this turn is a no-op; raising the level is
//! monotonic within a turn (§4.3, §8 testable properties).

use forge_config::ContextConfig;
use forge_protocol::CompressionPhase;
use forge_protocol::CompressionStats;
use forge_protocol::Thread;

use crate::compress::compress;
use crate::estimator::estimate_tokens_messages;
use crate::estimator::select_level;
use crate::estimator::CompressionLevel;
use crate::handoff::build_handoff;
use crate::prune::prune;
use crate::summarize::summarize;
use crate::summarize::Summarizer;

/// What the manager did on a given [`run`] call, for the stream's
/// `compaction` event (§3 "ThreadEvent").
#[derive(Debug, Clone)]
pub struct CompactionOutcome {
    pub level: CompressionLevel,
    pub applied: bool,
    pub stats: Option<CompressionStats>,
}

fn level_rank(level: CompressionLevel) -> u8 {
    match level {
        CompressionLevel::L0 => 0,
        CompressionLevel::L1 => 1,
        CompressionLevel::L2 => 2,
        CompressionLevel::L3 => 3,
        CompressionLevel::L4 => 4,
    }
}

fn parse_achieved(level: &Option<String>) -> Option<CompressionLevel> {
    match level.as_deref() {
        Some("L0") => Some(CompressionLevel::L0),
        Some("L1") => Some(CompressionLevel::L1),
        Some("L2") => Some(CompressionLevel::L2),
        Some("L3") => Some(CompressionLevel::L3),
        Some("L4") => Some(CompressionLevel::L4),
        _ => None,
    }
}

/// Run one compression pass over `thread`. `context_limit` is the
/// selected model's context window, used together with
/// `config.max_context_tokens` (whichever is tighter) to pick a level.
pub async fn run(
    thread: &mut Thread,
    config: &ContextConfig,
    context_limit: u32,
    summarizer: &dyn Summarizer,
) -> CompactionOutcome {
    let tokens_before = estimate_tokens_messages(&thread.messages);
    let level = select_level(tokens_before, context_limit.min(config.max_context_tokens));

    let achieved = parse_achieved(&thread.compression_state.achieved_level);
    if let Some(achieved) = achieved {
        if level_rank(level) <= level_rank(achieved) {
            return CompactionOutcome { level, applied: false, stats: None };
        }
    }

    thread.compression_state.is_compacting = true;
    let messages_before = thread.messages.len();

    match level {
        CompressionLevel::L0 => {
            thread.compression_state.is_compacting = false;
            return CompactionOutcome { level, applied: false, stats: None };
        }
        CompressionLevel::L1 => {
            thread.compression_state.phase = CompressionPhase::Compressing;
            prune(&mut thread.messages, config);
        }
        CompressionLevel::L2 => {
            thread.compression_state.phase = CompressionPhase::Compressing;
            compress(&mut thread.messages, config);
        }
        CompressionLevel::L3 => {
            thread.compression_state.phase = CompressionPhase::Summarizing;
            compress(&mut thread.messages, config);
            let summary = summarize(&mut thread.messages, config, summarizer).await;
            thread.compression_state.context_summary = Some(summary);
        }
        CompressionLevel::L4 => {
            thread.compression_state.phase = CompressionPhase::Summarizing;
            let summary = summarize(&mut thread.messages, config, summarizer).await;
            let handoff = build_handoff(thread, summary.clone());
            thread.compression_state.context_summary = Some(summary);
            thread.compression_state.handoff_document = Some(handoff);
            thread.compression_state.handoff_required = true;
        }
    }

    let tokens_after = estimate_tokens_messages(&thread.messages);
    let stats = CompressionStats {
        tokens_before,
        tokens_after,
        messages_before,
        messages_after: thread.messages.len(),
    };

    thread.compression_state.compression_stats = Some(stats);
    thread.compression_state.achieved_level = Some(level.as_str().to_string());
    thread.compression_state.phase = CompressionPhase::Done;
    thread.compression_state.is_compacting = false;

    CompactionOutcome { level, applied: true, stats: Some(stats) }
}

#[cfg(test)]
#[path = "manager.test.rs"]
mod tests;
