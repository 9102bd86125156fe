use forge_workspace::WorkspaceGateway;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn runs_allowlisted_command() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = RunCommandTool::new();
    let outcome = tool.execute(json!({ "command": "echo", "args": ["hi"] }), &ctx).await.unwrap();
    assert_eq!(outcome.content.trim(), "hi");
}

#[tokio::test]
async fn denied_command_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = RunCommandTool::new();
    let result = tool.execute(json!({ "command": "rm", "args": ["-rf", "/"] }), &ctx).await;
    assert!(result.is_err());
}
