//! `list_directory` (§4.5, §4.8 "list_directory"): lists the immediate
//! children of a workspace directory.

use async_trait::async_trait;
use forge_protocol::ApprovalClass;
use forge_protocol::ConcurrencyClass;
use forge_protocol::MutationKind;
use forge_protocol::ToolDescriptor;
use serde_json::json;
use serde_json::Value;
use snafu::ResultExt;

use crate::error::Result;
use crate::error::WorkspaceSnafu;
use crate::tool::ToolCallContext;
use crate::tool::ToolHandler;
use crate::tool::ToolOutcome;

pub struct ListDirectoryTool {
    descriptor: ToolDescriptor,
}

impl ListDirectoryTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "list_directory".to_string(),
                description: "List the immediate entries of a workspace directory.".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": { "path": { "type": "string" } },
                    "required": ["path"],
                }),
                approval_class: ApprovalClass::None,
                mutation_kind: MutationKind::ReadOnly,
                concurrency_class: ConcurrencyClass::ParallelSafe,
            },
        }
    }
}

impl Default for ListDirectoryTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for ListDirectoryTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let path = params["path"].as_str().unwrap_or_default();
        let entries = ctx.workspace.list_directory(path).await.context(WorkspaceSnafu)?;
        let rendered = entries
            .iter()
            .map(|entry| if entry.is_dir { format!("{}/", entry.name) } else { entry.name.clone() })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolOutcome::text(rendered))
    }
}

#[cfg(test)]
#[path = "list_directory.test.rs"]
mod tests;
