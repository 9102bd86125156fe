//! Agent Loop (C4, §4.4): the bounded request/tool-dispatch state
//! machine that drives one user turn from `idle` back to `idle`,
//! wired against every other component (C1 thread store, C2 message
//! assembler, C3 context manager, C5 tool dispatcher, C7 streaming
//! buffer, C8 workspace gateway via C5/C1).

mod driver;
mod error;
mod loop_detection;
mod provider;
mod result;

pub use driver::AgentLoop;
pub use driver::AgentLoopBuilder;
pub use driver::ApprovalRequest;
pub use driver::ApprovalResolution;
pub use driver::PendingToolCall;
pub use driver::TurnStep;
pub use error::LoopError;
pub use error::Result;
pub use loop_detection::LoopDetector;
pub use provider::ChatRequest;
pub use provider::ProviderClient;
pub use provider::PROVIDER_CHANNEL_CAPACITY;
pub use result::StopReason;
pub use result::TurnOutcome;
