use super::*;
use crate::engine::Engine;
use forge_protocol::Message;
use forge_protocol::UserContent;

#[tokio::test]
async fn rollback_restores_the_checkpointed_file_and_truncates_the_thread() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    let thread_id = engine.store.create_thread();

    std::fs::write(dir.path().join("a.txt"), "v1").unwrap();
    engine
        .store
        .add_user_message(UserContent::Text("edit a.txt".to_string()), vec!["a.txt".to_string()])
        .await
        .unwrap();
    std::fs::write(dir.path().join("a.txt"), "v2").unwrap();

    let checkpoint_id = {
        let thread = engine.store.thread().unwrap();
        thread
            .messages
            .iter()
            .find_map(|m| match m {
                Message::Checkpoint { id, .. } => Some(id.clone()),
                _ => None,
            })
            .unwrap()
    };

    rollback(&mut engine, &thread_id, &checkpoint_id).await.unwrap();

    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "v1");
    assert_eq!(engine.store.thread().unwrap().messages.len(), 1);
}

#[tokio::test]
async fn rollback_of_an_unknown_message_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    let thread_id = engine.store.create_thread();
    let result = rollback(&mut engine, &thread_id, "msg_ghost").await;
    assert!(result.is_err());
}
