use super::*;
use forge_protocol::Message;

fn sample_document() -> WorkspaceDocument {
    let mut doc = WorkspaceDocument::new();
    let mut thread = Thread::new("thread_1");
    thread.messages.push(Message::Checkpoint {
        id: "chk_1".to_string(),
        created_at: chrono::Utc::now(),
        kind: forge_protocol::CheckpointKind::UserMessage,
        snapshots: HashMap::new(),
    });
    doc.message_checkpoints.insert("thread_1".to_string(), vec!["chk_1".to_string()]);
    doc.threads.insert("thread_1".to_string(), thread);
    doc.current_thread_id = Some("thread_1".to_string());
    doc
}

#[test]
fn round_trips_through_json() {
    let doc = sample_document();
    let json = doc.to_json().unwrap();
    let restored = WorkspaceDocument::from_json(&json, Path::new("forge_state.json")).unwrap();
    assert_eq!(restored.current_thread_id, doc.current_thread_id);
    assert_eq!(restored.threads.len(), 1);
    assert_eq!(restored.message_checkpoints.get("thread_1"), doc.message_checkpoints.get("thread_1"));
}

#[test]
fn unknown_top_level_fields_are_ignored() {
    let doc = sample_document();
    let mut value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    value.as_object_mut().unwrap().insert("a_field_from_the_future".to_string(), serde_json::json!(42));
    let restored: WorkspaceDocument = serde_json::from_value(value).unwrap();
    assert_eq!(restored.threads.len(), 1);
}

#[test]
fn missing_schema_version_defaults_to_current() {
    let value = serde_json::json!({ "threads": {} });
    let restored: WorkspaceDocument = serde_json::from_value(value).unwrap();
    assert_eq!(restored.schema_version, DOCUMENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn load_of_a_missing_file_returns_an_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forge_state.json");
    let doc = WorkspaceDocument::load(&path).await.unwrap();
    assert!(doc.threads.is_empty());
    assert!(doc.current_thread_id.is_none());
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forge_state.json");
    let doc = sample_document();
    doc.save(&path).await.unwrap();

    let restored = WorkspaceDocument::load(&path).await.unwrap();
    assert_eq!(restored.current_thread_id, doc.current_thread_id);
    assert_eq!(restored.threads.len(), 1);
}

#[tokio::test]
async fn save_does_not_leave_a_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forge_state.json");
    sample_document().save(&path).await.unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}
