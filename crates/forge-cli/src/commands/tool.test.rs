use super::*;
use crate::engine::Engine;

#[tokio::test]
async fn run_writes_a_file_and_records_a_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();

    let args = serde_json::json!({ "path": "a.txt", "content": "hello" }).to_string();
    run(&mut engine, "write_file", args).await.unwrap();

    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "hello");
}

#[tokio::test]
async fn run_on_an_unknown_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    let result = run(&mut engine, "not_a_real_tool", "{}".to_string()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn run_with_invalid_params_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::open(dir.path()).await.unwrap();
    let result = run(&mut engine, "write_file", "{}".to_string()).await;
    assert!(result.is_err());
}

#[test]
fn list_does_not_panic_on_an_empty_registry() {
    let registry = forge_tools::ToolRegistry::new();
    let dispatcher = forge_tools::ToolDispatcher::new(registry);
    assert!(dispatcher.registry().descriptors().is_empty());
}
