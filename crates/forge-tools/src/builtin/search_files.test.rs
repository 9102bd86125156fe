use forge_workspace::WorkspaceGateway;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn finds_matching_lines() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "hello world\nfoo bar\n").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = SearchFilesTool::new();
    let outcome = tool.execute(json!({ "pattern": "hello" }), &ctx).await.unwrap();
    assert!(outcome.content.contains("hello world"));
}

#[tokio::test]
async fn no_matches_returns_empty_content() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "nothing here\n").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = SearchFilesTool::new();
    let outcome = tool.execute(json!({ "pattern": "zzz_absent" }), &ctx).await.unwrap();
    assert_eq!(outcome.content, "");
}
