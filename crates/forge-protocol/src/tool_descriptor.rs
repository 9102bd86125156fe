//! Static metadata a tool publishes to the registry (§5).

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// How much user sign-off a tool call requires before it may run (§5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalClass {
    /// Runs immediately, no prompt.
    None,
    /// Requires approval unless `auto_approve_edits` is set.
    Edits,
    /// Requires approval unless `auto_approve_terminal` is set.
    Terminal,
    /// Always requires explicit approval regardless of auto-approve
    /// configuration (§5 invariant).
    Dangerous,
    /// Delegated to an external MCP server's own approval policy.
    Mcp,
}

/// Whether a tool mutates workspace state, used to decide whether its
/// result needs pre-image snapshotting (§5, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    ReadOnly,
    Mutating,
}

/// How a tool call may be scheduled relative to others in the same wave
/// (§5 concurrency planner). Extends the teacher's binary
/// safe/unsafe split into the three-way model the dispatcher's wave
/// planner requires: `parallel_safe` calls with disjoint targets run
/// together, `target_exclusive` calls serialize against others sharing a
/// target, and `sequential` calls always run alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyClass {
    ParallelSafe,
    TargetExclusive,
    Sequential,
}

/// A tool's static registration entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters_schema: Value,
    pub approval_class: ApprovalClass,
    pub mutation_kind: MutationKind,
    pub concurrency_class: ConcurrencyClass,
}

#[cfg(test)]
#[path = "tool_descriptor.test.rs"]
mod tests;
