//! `http_get` (§4.5, §4.8 "http_get"): fetches a URL and returns its
//! response body as text.

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

pub struct HttpGetTool {
    descriptor: ToolDescriptor,
}

impl HttpGetTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "http_get".to_string(),
                description: "Fetch a URL over HTTP GET and return its response body.".to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": { "url": { "type": "string" } },
                    "required": ["url"],
                }),
                approval_class: ApprovalClass::None,
                mutation_kind: MutationKind::ReadOnly,
                concurrency_class: ConcurrencyClass::ParallelSafe,
            },
        }
    }
}

impl Default for HttpGetTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for HttpGetTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, params: Value, ctx: &ToolCallContext<'_>) -> Result<ToolOutcome> {
        let url = params["url"].as_str().unwrap_or_default();
        let body = ctx.workspace.http_get(url).await.context(WorkspaceSnafu)?;
        Ok(ToolOutcome::text(body))
    }
}

#[cfg(test)]
#[path = "http_get.test.rs"]
mod tests;
