//! `lsp_query` (§4.5, §4.8 "lsp_query"): forwards a language-server
//! query (go-to-definition, references, diagnostics, ...) to whatever
//! LSP backend the host wired in. Fails with an "unsupported" error
//! when none is configured (§6 narrow-seam default).

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

pub struct LspQueryTool {
    descriptor: ToolDescriptor,
}

impl LspQueryTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "lsp_query".to_string(),
                description: "Query the workspace's language server (definitions, references, diagnostics).".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "method": { "type": "string" },
                        "params": { "type": "object" },
                    },
                    "required": ["method"],
                }),
                approval_class: ApprovalClass::None,
                mutation_kind: MutationKind::ReadOnly,
                concurrency_class: ConcurrencyClass::ParallelSafe,
            },
        }
    }
}

impl Default for LspQueryTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for LspQueryTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let method = params["method"].as_str().unwrap_or_default();
        let query_params = params.get("params").cloned().unwrap_or(Value::Null);
        let result = ctx.workspace.lsp_query(method, query_params).await.context(WorkspaceSnafu)?;
        Ok(ToolOutcome::text(result.to_string()))
    }
}

#[cfg(test)]
#[path = "lsp_query.test.rs"]
mod tests;
