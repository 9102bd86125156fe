//! The LLM provider seam (§6 "LLM provider adapter (inbound to C4)").
//!
//! `stream_chat` is the engine's only dependency on a concrete model
//! backend. An adapter opens a request and hands back a channel of
//! [`LlmStreamEvent`]s; it MUST send `ToolCallComplete` for every
//! `ToolCallFragment` it started before sending `Done` (§6 contract).
//! The driver treats an early channel close with no `Done`/`Error` the
//! same as a stall: see [`crate::error::LoopError::StreamTimeout`].

use async_trait::async_trait;
use forge_protocol::ChatMessage;
use forge_protocol::LlmStreamEvent;
use forge_protocol::RequestParameters;
use forge_protocol::ToolSpecification;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How many buffered events a provider adapter may queue before the
/// driver has drained them. Generous enough that a burst of fragments
/// never blocks the adapter's own read loop.
pub const PROVIDER_CHANNEL_CAPACITY: usize = 256;

/// One turn's worth of request content, already assembled by C2
/// (forge-message's `assemble`). The system prompt rides as the first
/// message rather than a separate field (§9 "assembler always prepends
/// the system message").
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpecification>,
    pub parameters: RequestParameters,
}

/// The engine's only dependency on a concrete model backend (§6).
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Open a streaming chat completion. Returns a receiver the driver
    /// polls until it observes `Done`, `Error`, or the channel closes.
    /// `cancel` is advisory: a well-behaved adapter aborts its
    /// in-flight HTTP request and stops sending once it fires, but the
    /// driver does not rely on that alone (§4.4 "cancellation").
    async fn stream_chat(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<LlmStreamEvent>, String>;
}

#[cfg(test)]
#[path = "provider.test.rs"]
mod tests;
