//! Error taxonomy for the agent loop (C4, §7 "LoopDetectedError",
//! "BudgetExceededError"; everything else delegates to the crate whose
//! boundary actually raised it).

use std::any::Any;

use forge_error::ErrorExt;
use forge_error::Location;
use forge_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoopError {
    /// Repetition thresholds exceeded (§4.4 "loop detection"). Ends the
    /// turn with an `interrupted` assistant message; partial work is
    /// preserved.
    #[snafu(display("loop detected: {reason}"))]
    LoopDetected {
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// `max_tool_loops` request/tool rounds reached without the model
    /// stopping on its own (§4.4 "bounded iterations").
    #[snafu(display("exceeded {max_tool_loops} tool loops in a single turn"))]
    BudgetExceeded {
        max_tool_loops: u32,
        #[snafu(implicit)]
        location: Location,
    },

    /// The turn was cancelled via its `CancellationToken` (§4.4
    /// "cancellation"). In-flight disk writes are not undone; they
    /// surface as pending changes for review.
    #[snafu(display("turn cancelled"))]
    Cancelled {
        #[snafu(implicit)]
        location: Location,
    },

    /// The provider stream ended, or a single read off it stalled,
    /// without reaching `done`/`error` within the configured deadline.
    #[snafu(display("provider stream stalled after {millis}ms"))]
    StreamTimeout {
        millis: u64,
        #[snafu(implicit)]
        location: Location,
    },

    /// The provider adapter reported a terminal (non-retryable) error,
    /// or a retryable one survived every configured retry attempt.
    #[snafu(display("provider error: {message}"))]
    Provider {
        message: String,
        retryable: bool,
        #[snafu(implicit)]
        location: Location,
    },

    /// A tool-call fragment never closed with a matching
    /// `tool_call_complete` before the stream reached `done` (§6 adapter
    /// contract violation).
    #[snafu(display("tool call {id} never completed before the stream closed"))]
    UnterminatedToolCall {
        id: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// [`crate::driver::AgentLoop::resume_turn`] was called with no
    /// turn parked at `awaiting_approval` — caller misuse, since the
    /// driver only ever hands out a `TurnStep::AwaitingApproval` once
    /// per pause.
    #[snafu(display("resume_turn called with no turn awaiting approval"))]
    NoPendingApproval {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("{source}"))]
    Store {
        source: forge_thread_store::StoreError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("{source}"))]
    Tool {
        source: forge_tools::ToolError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("{source}"))]
    Context {
        source: forge_context::ContextError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("{source}"))]
    Message {
        source: forge_message::MessageError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for LoopError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoopError::LoopDetected { .. } => StatusCode::LoopDetected,
            LoopError::BudgetExceeded { .. } => StatusCode::BudgetExceeded,
            LoopError::Cancelled { .. } => StatusCode::Cancelled,
            LoopError::StreamTimeout { .. } => StatusCode::StreamTimeout,
            LoopError::Provider { retryable: true, .. } => StatusCode::ProviderRetryable,
            LoopError::Provider { retryable: false, .. } => StatusCode::ProviderTerminal,
            LoopError::UnterminatedToolCall { .. } => StatusCode::MalformedToolCall,
            LoopError::NoPendingApproval { .. } => StatusCode::InvariantViolation,
            LoopError::Store { source } => source.status_code(),
            LoopError::Tool { source } => source.status_code(),
            LoopError::Context { source } => source.status_code(),
            LoopError::Message { source } => source.status_code(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, LoopError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
