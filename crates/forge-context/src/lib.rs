//! Context Manager (C3, §4.3): token estimation and the 4-level
//! compression pipeline (prune, compress-old, summarize, handoff) that
//! keeps a thread under its model's context window.

mod compress;
mod error;
mod estimator;
mod handoff;
mod manager;
mod prune;
mod summarize;

pub use compress::compress;
pub use compress::CompressOutcome;
pub use error::ContextError;
pub use error::Result;
pub use estimator::estimate_tokens_message;
pub use estimator::estimate_tokens_messages;
pub use estimator::estimate_tokens_str;
pub use estimator::estimate_tokens_value;
pub use estimator::is_overflow;
pub use estimator::select_level;
pub use estimator::CompressionLevel;
pub use estimator::DEFAULT_OUTPUT_RESERVE;
pub use handoff::build_handoff;
pub use manager::run;
pub use manager::CompactionOutcome;
pub use prune::prune;
pub use prune::PruneOutcome;
pub use prune::PROTECTED_TOOLS;
pub use summarize::render_summary_text;
pub use summarize::summarize;
pub use summarize::Summarizer;
