use super::*;
use crate::engine::Engine;
use forge_protocol::ChangeStatus;
use forge_protocol::ChangeType;
use forge_protocol::FileSnapshot;
use forge_protocol::PendingChange;

#[tokio::test]
async fn list_prints_a_registered_pending_change() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    engine.store.create_thread();
    engine.store.register_pending_change(PendingChange {
        id: "change_1".to_string(),
        file_path: "a.txt".to_string(),
        tool_call_id: "call_1".to_string(),
        tool_name: "write_file".to_string(),
        status: ChangeStatus::Pending,
        snapshot: FileSnapshot::new("a.txt", None),
        new_content: Some("hello".to_string()),
        change_type: ChangeType::Create,
        lines_added: 1,
        lines_removed: 0,
    });

    assert_eq!(engine.store.pending_changes().count(), 1);
    list(&engine).unwrap();
}

#[tokio::test]
async fn list_does_not_fail_when_there_are_no_pending_changes() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    engine.store.create_thread();
    list(&engine).unwrap();
}
