//! Test doubles for the LLM-facing seams (§6): a scriptable
//! [`ProviderClient`], a pass-through [`Summarizer`], and a
//! filesystem-backed [`ContextExpander`]. Each seam is explicitly
//! out of this crate's scope (§1 "per-provider HTTP adapter
//! details"), so the end-to-end scenarios below drive the real state
//! machine against fakes rather than a live model.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use forge_context::Summarizer;
use forge_loop::ChatRequest;
use forge_loop::ProviderClient;
use forge_message::ContextExpander;
use forge_protocol::ContextItem;
use forge_protocol::LlmStreamEvent;
use forge_protocol::StructuredSummary;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One scripted model turn: the events `stream_chat` sends back, in
/// order, before closing the channel.
pub type ScriptedTurn = Vec<LlmStreamEvent>;

/// Replays a fixed sequence of turns, one per `stream_chat` call.
/// Panics if the driver asks for more turns than were scripted, so a
/// test's expected round count is self-checking.
pub struct ScriptedProvider {
    turns: Mutex<std::collections::VecDeque<ScriptedTurn>>,
}

impl ScriptedProvider {
    pub fn new(turns: Vec<ScriptedTurn>) -> Self {
        Self { turns: Mutex::new(turns.into_iter().collect()) }
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn stream_chat(
        &self,
        _request: ChatRequest,
        _cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<LlmStreamEvent>, String> {
        let turn = self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .expect("scenario asked for more model turns than were scripted");
        let (tx, rx) = mpsc::channel(turn.len().max(1));
        for event in turn {
            tx.send(event).await.expect("receiver not dropped yet");
        }
        Ok(rx)
    }
}

/// A summarizer that is never actually exercised by these scenarios
/// (none reach L3) but must still be wired for the loop to build.
pub struct UnusedSummarizer;

#[async_trait]
impl Summarizer for UnusedSummarizer {
    async fn summarize(&self, _span_text: &str) -> Result<StructuredSummary, String> {
        Err("summarizer should not be called by this scenario".to_string())
    }
}

/// Returns a fixed, non-fallback summary regardless of the span handed
/// to it, for the L3 scenario where the content of the summary doesn't
/// matter — only that one was produced.
pub struct ScriptedSummarizer;

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    async fn summarize(&self, _span_text: &str) -> Result<StructuredSummary, String> {
        Ok(StructuredSummary {
            created_at: chrono::Utc::now(),
            completed_tasks: vec![forge_protocol::CompletedTask {
                description: "explored the repository and located the failing test".to_string(),
                files_touched: vec!["src/lib.rs".to_string()],
            }],
            key_decisions: vec!["kept retry logic in the client rather than the server".to_string()],
            open_questions: Vec::new(),
            files_in_progress: vec!["src/lib.rs".to_string()],
            is_fallback: false,
        })
    }
}

/// Expands a pinned context item by reading it straight off disk,
/// rooted at a fixed workspace directory — the thin adapter over C8
/// that §4.2 says a host normally provides.
pub struct FsContextExpander {
    pub root: PathBuf,
}

#[async_trait]
impl ContextExpander for FsContextExpander {
    async fn expand(&self, item: &ContextItem) -> Result<String, String> {
        tokio::fs::read_to_string(self.root.join(&item.path)).await.map_err(|e| e.to_string())
    }
}
