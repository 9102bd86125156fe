//! Shapes produced by context compression levels L2-L4 (§4.3).

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Token accounting recorded after a compression pass, used for the
/// stream's `compaction` event and for regression testing of the
/// level-selection ratios.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompressionStats {
    pub tokens_before: u32,
    pub tokens_after: u32,
    pub messages_before: usize,
    pub messages_after: usize,
}

impl CompressionStats {
    pub fn ratio(&self) -> f64 {
        if self.tokens_before == 0 {
            return 1.0;
        }
        self.tokens_after as f64 / self.tokens_before as f64
    }
}

/// A single completed objective, retained verbatim across an L3 summary
/// (§4.3 "structured summary").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedTask {
    pub description: String,
    #[serde(default)]
    pub files_touched: Vec<String>,
}

/// The fixed-shape digest produced by L3 summarization. Distinct from a
/// free-text summary so downstream assembly can render each section with
/// its own heading rather than re-parsing prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredSummary {
    pub created_at: DateTime<Utc>,
    pub completed_tasks: Vec<CompletedTask>,
    pub key_decisions: Vec<String>,
    pub open_questions: Vec<String>,
    pub files_in_progress: Vec<String>,
    /// Set when the summarizing LLM call failed and this summary is a
    /// plain concatenation fallback instead (§4.3 degrade rule).
    #[serde(default)]
    pub is_fallback: bool,
}

/// The document handed to a fresh thread when L4 handoff fires (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffDocument {
    pub created_at: DateTime<Utc>,
    pub summary: StructuredSummary,
    pub pending_objective: Option<String>,
    pub pending_steps: Vec<String>,
    pub open_files: Vec<String>,
}

#[cfg(test)]
#[path = "compression.test.rs"]
mod tests;
