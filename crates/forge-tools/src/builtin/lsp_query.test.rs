use forge_workspace::WorkspaceGateway;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn unsupported_backend_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = LspQueryTool::new();
    let result = tool.execute(json!({ "method": "textDocument/definition" }), &ctx).await;
    assert!(result.is_err());
}
