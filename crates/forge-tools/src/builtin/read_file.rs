//! `read_file` (§4.5, grounded in the teacher's `core/tools/src/builtin`
//! `Read`): returns a file's contents, optionally sliced to a line
//! range so large files don't blow the context budget on their own.

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

pub struct ReadFileTool {
    descriptor: ToolDescriptor,
}

impl ReadFileTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "read_file".to_string(),
                description: "Read a UTF-8 text file from the workspace, optionally sliced to a 1-indexed inclusive line range.".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "start_line": { "type": "integer", "minimum": 1 },
                        "end_line": { "type": "integer", "minimum": 1 },
                    },
                    "required": ["path"],
                }),
                approval_class: ApprovalClass::None,
                mutation_kind: MutationKind::ReadOnly,
                concurrency_class: ConcurrencyClass::ParallelSafe,
            },
        }
    }
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new()
    }
}

fn slice_lines(content: &str, start_line: Option<u64>, end_line: Option<u64>) -> String {
    let (Some(start), Some(end)) = (start_line, end_line) else {
        return content.to_string();
    };
    content
        .lines()
        .enumerate()
        .filter(|(i, _)| {
            let line_no = *i as u64 + 1;
            line_no >= start && line_no <= end
        })
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ToolHandler for ReadFileTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn target_path(&self, params: &Value) -> Option<String> {
        params.get("path").and_then(Value::as_str).map(String::from)
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let path = params["path"].as_str().unwrap_or_default();
        let content = ctx.workspace.read_text(path).await.context(WorkspaceSnafu)?;
        let start_line = params.get("start_line").and_then(Value::as_u64);
        let end_line = params.get("end_line").and_then(Value::as_u64);
        Ok(ToolOutcome::text(slice_lines(&content, start_line, end_line)))
    }
}

#[cfg(test)]
#[path = "read_file.test.rs"]
mod tests;
