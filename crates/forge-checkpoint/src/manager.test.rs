use super::*;
use forge_protocol::UserContent;

async fn seed_thread(workspace: &WorkspaceGateway) -> Thread {
    workspace.write_text("src/main.rs", "original").await.unwrap();

    let manager = CheckpointManager::new(workspace);
    let checkpoint = manager
        .capture(CheckpointKind::UserMessage, &["src/main.rs".to_string()])
        .await;

    let mut thread = Thread::new("t1");
    thread.messages.push(Message::User {
        id: "u1".to_string(),
        created_at: chrono::Utc::now(),
        content: UserContent::Text("edit main.rs".to_string()),
        context_items: vec![],
    });
    thread.messages.push(checkpoint);
    thread
}

#[tokio::test]
async fn capture_records_pre_image_content() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    workspace.write_text("a.txt", "before").await.unwrap();

    let manager = CheckpointManager::new(&workspace);
    let checkpoint = manager
        .capture(CheckpointKind::ToolEdit, &["a.txt".to_string()])
        .await;

    match checkpoint {
        Message::Checkpoint { snapshots, .. } => {
            assert_eq!(
                snapshots.get("a.txt").unwrap().content,
                Some("before".to_string())
            );
        }
        _ => panic!("expected checkpoint message"),
    }
}

#[tokio::test]
async fn capture_records_absence_for_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());

    let manager = CheckpointManager::new(&workspace);
    let checkpoint = manager
        .capture(CheckpointKind::ToolEdit, &["new_file.rs".to_string()])
        .await;

    match checkpoint {
        Message::Checkpoint { snapshots, .. } => {
            assert!(snapshots.get("new_file.rs").unwrap().is_absent());
        }
        _ => panic!("expected checkpoint message"),
    }
}

#[tokio::test]
async fn rollback_restores_pre_image_content() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let thread = seed_thread(&workspace).await;

    workspace.write_text("src/main.rs", "edited by agent").await.unwrap();

    let manager = CheckpointManager::new(&workspace);
    let restored = manager.rollback_to(&thread, "u1").await.unwrap();
    assert_eq!(restored, 1);

    let contents = workspace.read_text("src/main.rs").await.unwrap();
    assert_eq!(contents, "original");
}

#[tokio::test]
async fn rollback_to_unknown_message_fails() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let thread = seed_thread(&workspace).await;

    let manager = CheckpointManager::new(&workspace);
    let err = manager.rollback_to(&thread, "missing").await.unwrap_err();
    assert!(matches!(err, crate::error::CheckpointError::NotFound { .. }));
}

#[test]
fn create_branch_deep_copies_the_thread() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let manager = CheckpointManager::new(&workspace);

    let mut thread = Thread::new("t1");
    thread.messages.push(Message::User {
        id: "u1".to_string(),
        created_at: chrono::Utc::now(),
        content: UserContent::Text("hi".to_string()),
        context_items: vec![],
    });

    let branch = manager.create_branch(&thread, "u1");
    assert_eq!(branch.thread.messages.len(), 1);
    assert_eq!(branch.forked_from_message_id, "u1");
    assert_eq!(branch.parent_thread_id, "t1");
}
