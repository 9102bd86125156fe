//! Message Assembler (C2, §4.2): converts a thread's stored messages
//! into the provider-agnostic request shape the agent loop sends to
//! `stream_chat`.

mod assembler;
mod error;
mod expand;
mod system_prompt;

pub use assembler::assemble;
pub use assembler::AssembledRequest;
pub use assembler::COMPACTED_TOOL_PLACEHOLDER;
pub use error::MessageError;
pub use error::Result;
pub use expand::expand_all;
pub use expand::render_expanded_items;
pub use expand::ContextExpander;
pub use expand::ExpandedItem;
pub use expand::MAX_EXPANSION_TOKENS_PER_ITEM;
pub use system_prompt::build_system_prompt;
pub use system_prompt::SystemPromptParts;
pub use system_prompt::WorkspaceMetadata;
