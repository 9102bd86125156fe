use super::*;

#[tokio::test]
async fn open_registers_every_builtin_tool() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::open(dir.path()).await.unwrap();
    assert!(engine.dispatcher.registry().contains("read_file"));
    assert!(engine.dispatcher.registry().contains("write_file"));
    assert!(engine.dispatcher.registry().contains("run_command"));
}

#[tokio::test]
async fn open_on_a_fresh_workspace_has_no_threads() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::open(dir.path()).await.unwrap();
    assert!(engine.store.thread_ids().is_empty());
}

#[tokio::test]
async fn persist_then_reopen_recovers_threads() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    let thread_id = engine.store.create_thread();
    engine.persist().await.unwrap();

    let reopened = Engine::open(dir.path()).await.unwrap();
    assert_eq!(reopened.store.current_thread_id(), Some(thread_id.as_str()));
}

#[test]
fn resolve_workspace_root_defaults_to_current_dir() {
    let resolved = resolve_workspace_root(None).unwrap();
    assert!(resolved.is_absolute());
}
