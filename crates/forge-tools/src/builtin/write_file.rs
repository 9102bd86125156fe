//! `write_file` (§4.5, grounded in the teacher's `Write`/`Edit`
//! builtins): overwrites (or creates) a file with the given content.
//! `edits`-class, so it halts at `awaiting_approval` unless
//! auto-approved (§4.5).

use async_trait::async_trait;
use forge_protocol::ApprovalClass;
use forge_protocol::ChangeType;
use forge_protocol::ConcurrencyClass;
use forge_protocol::MutationKind;
use forge_protocol::ToolDescriptor;
use serde_json::json;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;
use snafu::ResultExt;

use crate::error::Result;
use crate::error::WorkspaceSnafu;
use crate::tool::FileMutation;
use crate::tool::ToolCallContext;
use crate::tool::ToolHandler;
use crate::tool::ToolOutcome;
use crate::tool::ToolPreview;

fn diff_stat(before: &str, after: &str) -> (u32, u32) {
    let diff = TextDiff::from_lines(before, after);
    let mut added = 0u32;
    let mut removed = 0u32;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, removed)
}

pub struct WriteFileTool {
    descriptor: ToolDescriptor,
}

impl WriteFileTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "write_file".to_string(),
                description: "Create or overwrite a file in the workspace with the given content.".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "content": { "type": "string" },
                    },
                    "required": ["path", "content"],
                }),
                approval_class: ApprovalClass::Edits,
                mutation_kind: MutationKind::Mutating,
                concurrency_class: ConcurrencyClass::TargetExclusive,
            },
        }
    }
}

impl Default for WriteFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for WriteFileTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn target_path(&self, params: &Value) -> Option<String> {
        params.get("path").and_then(Value::as_str).map(String::from)
    }

    async fn preview(&self, params: &Value, ctx: &ToolCallContext<'_>) -> Result<Option<ToolPreview>> {
        let path = params["path"].as_str().unwrap_or_default();
        let content = params["content"].as_str().unwrap_or_default();
        let existed_before = ctx.workspace.read_text(path).await.ok();
        let change_type = if existed_before.is_some() { ChangeType::Modify } else { ChangeType::Create };
        let (added, removed) = diff_stat(existed_before.as_deref().unwrap_or(""), content);
        Ok(Some(ToolPreview {
            change_type,
            new_content: Some(content.to_string()),
            lines_added: added,
            lines_removed: removed,
        }))
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let path = params["path"].as_str().unwrap_or_default();
        let content = params["content"].as_str().unwrap_or_default();

        let existed_before = ctx.workspace.read_text(path).await.ok();
        let change_type = if existed_before.is_some() { ChangeType::Modify } else { ChangeType::Create };
        let (added, removed) = diff_stat(existed_before.as_deref().unwrap_or(""), content);

        ctx.workspace.write_text(path, content).await.context(WorkspaceSnafu)?;

        let mutation = FileMutation { path: path.to_string(), change_type, new_content: Some(content.to_string()) };
        Ok(ToolOutcome::text(format!("wrote {path}: +{added} -{removed} lines")).with_mutation(mutation))
    }
}

#[cfg(test)]
#[path = "write_file.test.rs"]
mod tests;
