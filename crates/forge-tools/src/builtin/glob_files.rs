//! `glob_files` (§4.5, §4.8 "glob_files"): lists workspace paths whose
//! relative path matches a glob pattern.

use async_trait::async_trait;
use forge_protocol::ApprovalClass;
use forge_protocol::ConcurrencyClass;
use forge_protocol::MutationKind;
use forge_protocol::ToolDescriptor;
use globset::Glob;
use serde_json::json;
use serde_json::Value;

use crate::error::HandlerFailedSnafu;
use crate::error::Result;
use crate::error::WorkspaceSnafu;
use crate::tool::ToolCallContext;
use crate::tool::ToolHandler;
use crate::tool::ToolOutcome;
use snafu::ResultExt;

const DEFAULT_MAX_ENTRIES: usize = 5000;

pub struct GlobFilesTool {
    descriptor: ToolDescriptor,
}

impl GlobFilesTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "glob_files".to_string(),
                description: "List workspace paths whose path matches a glob pattern (e.g. `**/*.rs`).".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "pattern": { "type": "string" },
                        "path": { "type": "string" },
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

impl Default for GlobFilesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for GlobFilesTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let pattern = params["pattern"].as_str().unwrap_or_default();
        let path = params.get("path").and_then(Value::as_str).unwrap_or(".");

        let glob = Glob::new(pattern)
            .map_err(|source| {
                HandlerFailedSnafu { name: self.descriptor.name.clone(), message: format!("invalid glob: {source}") }
                    .build()
            })?
            .compile_matcher();

        let tree = ctx.workspace.get_dir_tree(path, DEFAULT_MAX_ENTRIES).context(WorkspaceSnafu)?;
        let mut matched = tree
            .iter()
            .filter(|entry| glob.is_match(entry))
            .map(|entry| entry.display().to_string())
            .collect::<Vec<_>>();
        matched.sort();

        Ok(ToolOutcome::text(matched.join("\n")))
    }
}

#[cfg(test)]
#[path = "glob_files.test.rs"]
mod tests;
