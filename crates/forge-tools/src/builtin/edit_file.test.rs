use forge_workspace::WorkspaceGateway;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn replaces_single_occurrence() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.rs"), "fn old_name() {}").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = EditFileTool::new();
    let outcome = tool
        .execute(json!({ "path": "a.rs", "old_string": "old_name", "new_string": "new_name" }), &ctx)
        .await
        .unwrap();
    assert_eq!(outcome.mutations[0].new_content.as_deref(), Some("fn new_name() {}"));
}

#[tokio::test]
async fn missing_anchor_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.rs"), "fn foo() {}").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = EditFileTool::new();
    let result = tool.execute(json!({ "path": "a.rs", "old_string": "bar", "new_string": "baz" }), &ctx).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn ambiguous_anchor_requires_replace_all() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.rs"), "x x x").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = EditFileTool::new();
    let result = tool.execute(json!({ "path": "a.rs", "old_string": "x", "new_string": "y" }), &ctx).await;
    assert!(result.is_err());

    let outcome = tool
        .execute(json!({ "path": "a.rs", "old_string": "x", "new_string": "y", "replace_all": true }), &ctx)
        .await
        .unwrap();
    assert_eq!(outcome.mutations[0].new_content.as_deref(), Some("y y y"));
}
