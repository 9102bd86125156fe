use forge_workspace::WorkspaceGateway;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn writes_new_file_as_create() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = WriteFileTool::new();
    let outcome = tool.execute(json!({ "path": "new.txt", "content": "hello" }), &ctx).await.unwrap();
    assert_eq!(outcome.mutations.len(), 1);
    assert_eq!(outcome.mutations[0].change_type, ChangeType::Create);
    assert_eq!(tokio::fs::read_to_string(dir.path().join("new.txt")).await.unwrap(), "hello");
}

#[tokio::test]
async fn overwriting_existing_file_is_modify() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("existing.txt"), "old").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = WriteFileTool::new();
    let outcome = tool.execute(json!({ "path": "existing.txt", "content": "new" }), &ctx).await.unwrap();
    assert_eq!(outcome.mutations[0].change_type, ChangeType::Modify);
}
