use forge_workspace::WorkspaceGateway;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn matches_extension_glob() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.rs"), "").await.unwrap();
    tokio::fs::write(dir.path().join("b.txt"), "").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = GlobFilesTool::new();
    let outcome = tool.execute(json!({ "pattern": "*.rs" }), &ctx).await.unwrap();
    assert!(outcome.content.contains("a.rs"));
    assert!(!outcome.content.contains("b.txt"));
}

#[tokio::test]
async fn invalid_glob_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = GlobFilesTool::new();
    let result = tool.execute(json!({ "pattern": "[" }), &ctx).await;
    assert!(result.is_err());
}
