use super::*;
use crate::engine::Engine;

#[tokio::test]
async fn new_creates_and_persists_a_thread() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    new(&mut engine).await.unwrap();
    assert_eq!(engine.store.thread_ids().len(), 1);

    let reopened = Engine::open(dir.path()).await.unwrap();
    assert_eq!(reopened.store.thread_ids().len(), 1);
}

#[tokio::test]
async fn send_appends_a_user_message_and_its_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    let thread_id = engine.store.create_thread();

    send(&mut engine, &thread_id, "hello".to_string()).await.unwrap();

    engine.store.switch_thread(&thread_id).unwrap();
    let thread = engine.store.thread().unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert!(matches!(thread.messages[1], Message::User { .. }));
}

#[tokio::test]
async fn send_to_an_unknown_thread_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    let result = send(&mut engine, "ghost", "hi".to_string()).await;
    assert!(result.is_err());
}

#[test]
fn truncate_marks_long_text_with_an_ellipsis() {
    let long = "x".repeat(200);
    let truncated = truncate(&long);
    assert!(truncated.ends_with('…'));
    assert!(truncated.len() < long.len());
}

#[test]
fn truncate_leaves_short_text_untouched() {
    assert_eq!(truncate("short"), "short");
}
