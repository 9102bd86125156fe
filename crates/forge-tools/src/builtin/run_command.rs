//! `run_command` (§4.5, §4.8 "run_command"): runs an allowlisted shell
//! command inside the workspace root. Always `ApprovalClass::Terminal`
//! and `ConcurrencyClass::Sequential` (§4.5: terminal commands never
//! batch with anything else).

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

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub struct RunCommandTool {
    descriptor: ToolDescriptor,
}

impl RunCommandTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "run_command".to_string(),
                description: "Run an allowlisted command in the workspace root and capture stdout/stderr.".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "command": { "type": "string" },
                        "args": { "type": "array", "items": { "type": "string" } },
                        "timeout_ms": { "type": "integer", "minimum": 1 },
                    },
                    "required": ["command"],
                }),
                approval_class: ApprovalClass::Terminal,
                mutation_kind: MutationKind::ReadOnly,
                concurrency_class: ConcurrencyClass::Sequential,
            },
        }
    }
}

impl Default for RunCommandTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for RunCommandTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let command = params["command"].as_str().unwrap_or_default();
        let args = params
            .get("args")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(String::from).collect::<Vec<_>>())
            .unwrap_or_default();
        let timeout_ms = params.get("timeout_ms").and_then(Value::as_u64).unwrap_or(DEFAULT_TIMEOUT_MS);

        let output = ctx.workspace.run_command(command, &args, timeout_ms).await.context(WorkspaceSnafu)?;

        let rendered = if output.exit_code == 0 {
            output.stdout
        } else {
            format!("exit code {}\nstdout:\n{}\nstderr:\n{}", output.exit_code, output.stdout, output.stderr)
        };
        Ok(ToolOutcome::text(rendered))
    }
}

#[cfg(test)]
#[path = "run_command.test.rs"]
mod tests;
