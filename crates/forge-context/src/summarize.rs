//! L3 summarize (§4.3): replace the compressible span of a thread with
//! a single synthesized assistant message carrying a
//! [`StructuredSummary`], generated by an LLM call through the
//! [`Summarizer`] seam. Falls back to a best-effort textual
//! concatenation if that call fails, per the degrade rule in §4.3 —
//! pending user intent is never silently dropped.

use async_trait::async_trait;
use chrono::Utc;

use forge_config::ContextConfig;
use forge_protocol::AssistantPart;
use forge_protocol::CompletedTask;
use forge_protocol::Message;
use forge_protocol::StructuredSummary;

/// The engine's side of the `stream_chat`-backed summarizer call (§4.3
/// "Generate a StructuredSummary using the LLM with a fixed summarizer
/// prompt"). Left as a seam: this crate has no provider adapter of its
/// own (§1 out-of-scope).
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, span_text: &str) -> Result<StructuredSummary, String>;
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

/// Flatten a message span into text for the summarizer prompt.
fn render_span(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        match message {
            Message::User { content, .. } => {
                out.push_str("User: ");
                out.push_str(&content.as_text());
                out.push('\n');
            }
            Message::Assistant { content, .. } => {
                out.push_str("Assistant: ");
                out.push_str(content);
                out.push('\n');
            }
            Message::Tool { name, content, .. } => {
                out.push_str(&format!("Tool[{name}]: {content}\n"));
            }
            Message::Checkpoint { .. } => {}
        }
    }
    out
}

/// Best-effort fallback summary when the summarizer call fails: a
/// single "decision" capturing the raw concatenation, so pending
/// intent survives even without a structured digest.
fn fallback_summary(span_text: &str) -> StructuredSummary {
    StructuredSummary {
        created_at: Utc::now(),
        completed_tasks: vec![CompletedTask {
            description: "Unsummarized history (summarizer unavailable)".to_string(),
            files_touched: Vec::new(),
        }],
        key_decisions: Vec::new(),
        open_questions: Vec::new(),
        files_in_progress: Vec::new(),
        is_fallback: true,
    }
    .with_raw_fallback_text(span_text)
}

/// Extension so the fallback can stash the raw concatenation somewhere
/// a human/model can still read it, without widening the protocol
/// shape with a field only the fallback path uses.
trait WithRawFallbackText {
    fn with_raw_fallback_text(self, text: &str) -> Self;
}

impl WithRawFallbackText for StructuredSummary {
    fn with_raw_fallback_text(mut self, text: &str) -> Self {
        const MAX_LEN: usize = 4_000;
        let truncated = if text.len() > MAX_LEN { &text[..MAX_LEN] } else { text };
        self.key_decisions.push(format!("raw history: {truncated}"));
        self
    }
}

/// Render a [`StructuredSummary`] into the text body of the synthesized
/// assistant message that replaces the compressed span.
pub fn render_summary_text(summary: &StructuredSummary) -> String {
    let mut out = String::new();
    if summary.is_fallback {
        out.push_str("[fallback summary — structured summarization was unavailable]\n");
    }
    out.push_str("Completed:\n");
    for task in &summary.completed_tasks {
        out.push_str(&format!("- {}\n", task.description));
    }
    if !summary.key_decisions.is_empty() {
        out.push_str("Decisions:\n");
        for decision in &summary.key_decisions {
            out.push_str(&format!("- {decision}\n"));
        }
    }
    if !summary.open_questions.is_empty() {
        out.push_str("Open questions:\n");
        for question in &summary.open_questions {
            out.push_str(&format!("- {question}\n"));
        }
    }
    if !summary.files_in_progress.is_empty() {
        out.push_str(&format!("Files in progress: {}\n", summary.files_in_progress.join(", ")));
    }
    out
}

/// Replace the old span of `messages` (everything before the
/// recent-turns boundary) with one synthesized assistant message
/// carrying the produced [`StructuredSummary`]. Returns the summary
/// that was produced (real or fallback) for the caller to attach to
/// `CompressionState::context_summary`.
pub async fn summarize(
    messages: &mut Vec<Message>,
    config: &ContextConfig,
    summarizer: &dyn Summarizer,
) -> StructuredSummary {
    let boundary = recent_turns_boundary(messages, config.keep_recent_turns);
    if boundary == 0 {
        // Nothing old enough to summarize away.
        return StructuredSummary {
            created_at: Utc::now(),
            completed_tasks: Vec::new(),
            key_decisions: Vec::new(),
            open_questions: Vec::new(),
            files_in_progress: Vec::new(),
            is_fallback: false,
        };
    }

    let old_span: Vec<Message> = messages.drain(..boundary).collect();
    let span_text = render_span(&old_span);

    let summary = match summarizer.summarize(&span_text).await {
        Ok(summary) => summary,
        Err(_) => fallback_summary(&span_text),
    };

    let rendered = render_summary_text(&summary);
    let now = Utc::now();
    let synthesized = Message::Assistant {
        id: format!("summary_{}", uuid::Uuid::new_v4()),
        created_at: now,
        content: rendered.clone(),
        parts: vec![AssistantPart::Text { text: rendered }],
        tool_calls: Vec::new(),
        // This message IS the fold boundary future L1 passes should
        // stop at (§4.3 "preserve the fork boundary").
        compacted_at: Some(now),
    };
    messages.insert(0, synthesized);
    summary
}

#[cfg(test)]
#[path = "summarize.test.rs"]
mod tests;
