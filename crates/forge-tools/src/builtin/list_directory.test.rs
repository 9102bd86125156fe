use forge_workspace::WorkspaceGateway;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn lists_files_and_dirs_sorted() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("b.txt"), "").await.unwrap();
    tokio::fs::create_dir(dir.path().join("a_dir")).await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let ctx = ToolCallContext { workspace: &workspace, cancel: CancellationToken::new() };

    let tool = ListDirectoryTool::new();
    let outcome = tool.execute(json!({ "path": "." }), &ctx).await.unwrap();
    assert_eq!(outcome.content, "a_dir/\nb.txt");
}
