use forge_workspace::WorkspaceGateway;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn reads_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "one\ntwo\nthree").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = ReadFileTool::new();
    let outcome = tool.execute(json!({ "path": "a.txt" }), &ctx).await.unwrap();
    assert_eq!(outcome.content, "one\ntwo\nthree");
}

#[tokio::test]
async fn reads_line_range() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "one\ntwo\nthree\nfour").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = ReadFileTool::new();
    let outcome = tool.execute(json!({ "path": "a.txt", "start_line": 2, "end_line": 3 }), &ctx).await.unwrap();
    assert_eq!(outcome.content, "two\nthree");
}

#[tokio::test]
async fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = ReadFileTool::new();
    let result = tool.execute(json!({ "path": "missing.txt" }), &ctx).await;
    assert!(result.is_err());
}

#[test]
fn target_path_extracts_the_path_argument() {
    let tool = ReadFileTool::new();
    assert_eq!(tool.target_path(&json!({ "path": "a.txt" })), Some("a.txt".to_string()));
}
