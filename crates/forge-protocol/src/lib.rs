//! Shared data model for the agent orchestration engine: threads,
//! messages, branches, checkpoints, tool descriptors, and the event
//! types that cross the engine's inbound (provider) and outbound
//! (host/UI) seams.

mod branch;
mod compression;
mod event;
mod message;
mod pending_change;
mod provider;
mod snapshot;
mod thread;
mod tool_descriptor;

pub use branch::Branch;
pub use compression::CompletedTask;
pub use compression::CompressionStats;
pub use compression::HandoffDocument;
pub use compression::StructuredSummary;
pub use event::ThreadEvent;
pub use message::AssistantPart;
pub use message::CheckpointKind;
pub use message::Message;
pub use message::ToolCallPart;
pub use message::ToolCallPatch;
pub use message::ToolResultType;
pub use message::UserContent;
pub use message::UserContentPart;
pub use pending_change::ChangeStatus;
pub use pending_change::ChangeType;
pub use pending_change::PendingChange;
pub use provider::ChatMessage;
pub use provider::ChatToolCall;
pub use provider::LlmStreamEvent;
pub use provider::RequestParameters;
pub use provider::ToolSpecification;
pub use provider::Usage;
pub use snapshot::FileSnapshot;
pub use thread::CompressionPhase;
pub use thread::CompressionState;
pub use thread::ContextItem;
pub use thread::PendingObjective;
pub use thread::StreamPhase;
pub use thread::StreamState;
pub use thread::Thread;
pub use tool_descriptor::ApprovalClass;
pub use tool_descriptor::ConcurrencyClass;
pub use tool_descriptor::MutationKind;
pub use tool_descriptor::ToolDescriptor;
