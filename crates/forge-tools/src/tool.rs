//! The handler trait every builtin tool implements (§4.5, §6 "Tool
//! execution adapter"): `(params, ctx) -> Result<ToolOutput, ToolError>`.
//! Tools never call other tools directly — the only capability surface
//! they're handed is [`ToolCallContext`], which narrows to the
//! workspace gateway and a cancellation token.

use std::sync::Arc;

use async_trait::async_trait;
use forge_protocol::ChangeType;
use forge_protocol::ToolDescriptor;
use forge_workspace::WorkspaceGateway;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// A single file mutation a tool made, reported back so the caller can
/// register a [`forge_protocol::PendingChange`] and checkpoint it
/// (§4.5 "side-effect tracking"). Dispatching to a `ThreadStore` is the
/// loop's job, not the tool's — tools only report what they touched.
#[derive(Debug, Clone)]
pub struct FileMutation {
    pub path: String,
    pub change_type: ChangeType,
    /// `None` for a delete; `Some` content for create/modify.
    pub new_content: Option<String>,
}

/// What a successful tool execution produced.
#[derive(Debug, Clone, Default)]
pub struct ToolOutcome {
    /// Text surfaced to the model as the `tool` message content.
    pub content: String,
    /// File mutations made by this call, oldest-first.
    pub mutations: Vec<FileMutation>,
}

impl ToolOutcome {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: content.into(), mutations: Vec::new() }
    }

    pub fn with_mutation(mut self, mutation: FileMutation) -> Self {
        self.mutations.push(mutation);
        self
    }
}

/// Capability surface a tool handler is given during execution. Bound
/// to one call: a fresh [`CancellationToken`] child per call lets the
/// dispatcher cancel an individual in-flight tool without tearing down
/// the whole batch (§5 "ctx exposes C8 and a cancel token").
pub struct ToolCallContext<'a> {
    pub workspace: &'a WorkspaceGateway,
    pub cancel: CancellationToken,
}

/// A dry-run preview of what a mutating call would do, computed
/// without touching disk (§4.5 "surface as pending with a diff
/// preview"; §3 `PendingChange.lines_added`/`lines_removed`). Only
/// mutating tools override [`ToolHandler::preview`]; the default is
/// `None` for read-only tools, which never gate on approval.
#[derive(Debug, Clone)]
pub struct ToolPreview {
    pub change_type: ChangeType,
    /// `None` for a delete preview.
    pub new_content: Option<String>,
    pub lines_added: u32,
    pub lines_removed: u32,
}

/// A tool binds its static metadata and its execution behavior behind
/// this trait (§9 "Dynamic tool dispatch via string names → static
/// registry keyed by name, tool behavior behind a narrow capability
/// interface").
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    /// The workspace-relative path this call targets, if any — used by
    /// the concurrency planner to serialize `target_exclusive` calls
    /// that touch the same file (§4.5). Read-only tools that don't
    /// target a single path (e.g. `search_files`) return `None`.
    fn target_path(&self, _params: &Value) -> Option<String> {
        None
    }

    /// Compute what this call would do without mutating the
    /// workspace, for the approval gate's diff preview (§4.5). Tools
    /// with `mutation_kind: Mutating` should override this; the
    /// default suits read-only tools, which never halt on approval.
    async fn preview(&self, _params: &Value, _ctx: &ToolCallContext<'_>) -> Result<Option<ToolPreview>> {
        Ok(None)
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome>;
}

pub type BoxedTool = Arc<dyn ToolHandler>;
