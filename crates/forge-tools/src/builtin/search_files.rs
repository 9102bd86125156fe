//! `search_files` (§4.5, §4.8 "search_files"): regex content search
//! over the workspace tree.

use async_trait::async_trait;
use forge_protocol::ApprovalClass;
use forge_protocol::ConcurrencyClass;
use forge_protocol::MutationKind;
use forge_protocol::ToolDescriptor;
use serde_json::json;
use serde_json::Value;

use crate::error::HandlerFailedSnafu;
use crate::error::Result;
use crate::tool::ToolCallContext;
use crate::tool::ToolHandler;
use crate::tool::ToolOutcome;

const DEFAULT_LIMIT: usize = 200;

pub struct SearchFilesTool {
    descriptor: ToolDescriptor,
}

impl SearchFilesTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "search_files".to_string(),
                description: "Regex content search over a workspace directory, respecting .gitignore.".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "pattern": { "type": "string" },
                        "path": { "type": "string" },
                        "limit": { "type": "integer", "minimum": 1 },
                    },
                    "required": ["pattern"],
                }),
                approval_class: ApprovalClass::None,
                mutation_kind: MutationKind::ReadOnly,
                concurrency_class: ConcurrencyClass::ParallelSafe,
            },
        }
    }
}

impl Default for SearchFilesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for SearchFilesTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let pattern = params["pattern"].as_str().unwrap_or_default();
        let path = params.get("path").and_then(Value::as_str).unwrap_or(".");
        let limit = params.get("limit").and_then(Value::as_u64).map(|v| v as usize).unwrap_or(DEFAULT_LIMIT);

        let matches = ctx.workspace.search_files(pattern, path, limit).map_err(|source| {
            HandlerFailedSnafu { name: self.descriptor.name.clone(), message: source.to_string() }.build()
        })?;

        let rendered = matches
            .iter()
            .map(|m| format!("{}:{}:{}", m.path.display(), m.line_number, m.line))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolOutcome::text(rendered))
    }
}

#[cfg(test)]
#[path = "search_files.test.rs"]
mod tests;
