use super::*;
use crate::engine::Engine;

#[tokio::test]
async fn show_prints_the_resolved_config_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::open(dir.path()).await.unwrap();
    show(&engine).unwrap();

    let printed = serde_json::to_string_pretty(&engine.config).unwrap();
    assert!(printed.contains("loop_config") || printed.contains("tools"));
}
