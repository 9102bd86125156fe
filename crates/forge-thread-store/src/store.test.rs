use super::*;
use forge_protocol::AssistantPart;
use forge_protocol::ChangeType;
use forge_protocol::FileSnapshot;

fn store_in(dir: &tempfile::TempDir) -> ThreadStore {
    let workspace = WorkspaceGateway::new(dir.path());
    let mut store = ThreadStore::new(workspace);
    store.create_thread();
    store
}

#[tokio::test]
async fn add_user_message_creates_a_checkpoint_before_the_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.workspace().write_text("a.txt", "before").await.unwrap();

    store.add_user_message(UserContent::Text("hi".to_string()), vec!["a.txt".to_string()]).await.unwrap();

    let thread = store.thread().unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert!(matches!(thread.messages[0], Message::Checkpoint { .. }));
    assert!(matches!(thread.messages[1], Message::User { .. }));
}

#[tokio::test]
async fn streaming_text_merges_until_a_tool_call_opens_a_new_part() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);

    let message_id = store.add_assistant_message().unwrap();
    store.append_to_assistant(&message_id, "Hello, ").unwrap();
    store.append_to_assistant(&message_id, "world.").unwrap();
    store
        .add_tool_call_part(
            &message_id,
            ToolCallPart { id: "call_1".to_string(), name: "read_file".to_string(), arguments: Value::Null, params_summary: None },
        )
        .unwrap();
    store.append_to_assistant(&message_id, "Done.").unwrap();

    let thread = store.thread().unwrap();
    let Message::Assistant { content, parts, .. } = thread.find_message(&message_id).unwrap() else {
        panic!("expected an assistant message");
    };
    assert_eq!(content, "Hello, world.Done.");
    assert_eq!(parts.len(), 3);
    assert!(matches!(&parts[0], AssistantPart::Text { text } if text == "Hello, world."));
    assert!(matches!(&parts[1], AssistantPart::ToolCall { .. }));
    assert!(matches!(&parts[2], AssistantPart::Text { text } if text == "Done."));
}

#[tokio::test]
async fn update_tool_call_creates_missing_calls_and_patches_existing_ones_idempotently() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let message_id = store.add_assistant_message().unwrap();

    let patch = ToolCallPatch { name: Some("write_file".to_string()), arguments: Some(serde_json::json!({"path": "a.rs"})) };
    store.update_tool_call(&message_id, "call_1", patch.clone()).unwrap();
    store.update_tool_call(&message_id, "call_1", patch).unwrap();

    let thread = store.thread().unwrap();
    let Message::Assistant { parts, tool_calls, .. } = thread.find_message(&message_id).unwrap() else {
        panic!("expected an assistant message");
    };
    assert_eq!(tool_calls.len(), 1);
    assert_eq!(parts.len(), 1);
    assert!(matches!(&parts[0], AssistantPart::ToolCall { tool_call } if tool_call.name == "write_file"));
}

#[tokio::test]
async fn mutating_tool_result_is_checkpointed_before_the_tool_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    // The pre-image is captured by the caller before the tool mutates
    // the file; the workspace already reflects the post-edit content by
    // the time `add_tool_result` runs.
    let pre_image = FileSnapshot::new("a.rs".to_string(), Some("before".to_string()));
    store.workspace().write_text("a.rs", "after").await.unwrap();

    store
        .add_tool_result(
            "call_1",
            "write_file",
            "wrote a.rs".to_string(),
            ToolResultType::Success,
            None,
            true,
            &["a.rs".to_string()],
            &[pre_image],
        )
        .await
        .unwrap();

    let thread = store.thread().unwrap();
    assert_eq!(thread.messages.len(), 2);
    let Message::Checkpoint { snapshots, .. } = &thread.messages[0] else {
        panic!("expected a checkpoint message");
    };
    assert_eq!(snapshots.get("a.rs").unwrap().content.as_deref(), Some("before"));
    assert!(matches!(thread.messages[1], Message::Tool { .. }));
}

#[tokio::test]
async fn delete_messages_after_truncates_and_drops_orphaned_pending_changes() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let user_id = store.add_user_message(UserContent::Text("hi".to_string()), vec![]).await.unwrap();
    let tool_id = store
        .add_tool_result("call_1", "write_file", "ok".to_string(), ToolResultType::Success, None, false, &[], &[])
        .await
        .unwrap();

    store.register_pending_change(PendingChange {
        id: "pc1".to_string(),
        file_path: "a.rs".to_string(),
        tool_call_id: "call_1".to_string(),
        tool_name: "write_file".to_string(),
        status: ChangeStatus::Pending,
        snapshot: FileSnapshot::new("a.rs".to_string(), None),
        new_content: Some("fn main() {}".to_string()),
        change_type: ChangeType::Create,
        lines_added: 1,
        lines_removed: 0,
    });

    store.delete_messages_after(&user_id).unwrap();

    let thread = store.thread().unwrap();
    assert!(thread.find_message(&tool_id).is_none());
    assert_eq!(store.pending_changes().count(), 0);
}

#[tokio::test]
async fn rollback_restores_files_and_truncates_the_thread() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.workspace().write_text("a.rs", "original").await.unwrap();

    let user_id = store.add_user_message(UserContent::Text("edit a.rs".to_string()), vec!["a.rs".to_string()]).await.unwrap();
    store.workspace().write_text("a.rs", "edited by agent").await.unwrap();
    store.add_assistant_message().unwrap();

    let restored = store.rollback_to(&user_id).await.unwrap();
    assert_eq!(restored, 1);
    assert_eq!(store.workspace().read_text("a.rs").await.unwrap(), "original");

    let thread = store.thread().unwrap();
    assert_eq!(thread.messages.last().unwrap().id(), user_id);
}

#[tokio::test]
async fn rollback_to_the_same_target_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.workspace().write_text("a.rs", "original").await.unwrap();

    let user_id = store.add_user_message(UserContent::Text("edit a.rs".to_string()), vec!["a.rs".to_string()]).await.unwrap();
    store.workspace().write_text("a.rs", "edited by agent").await.unwrap();
    store.add_assistant_message().unwrap();

    store.rollback_to(&user_id).await.unwrap();
    let after_first = store.thread().unwrap().messages.len();
    let content_after_first = store.workspace().read_text("a.rs").await.unwrap();

    // With no further activity since, rolling back to the same target
    // again must leave the thread and workspace exactly as they were.
    let restored_again = store.rollback_to(&user_id).await.unwrap();
    assert_eq!(restored_again, 1);
    assert_eq!(store.thread().unwrap().messages.len(), after_first);
    assert_eq!(store.workspace().read_text("a.rs").await.unwrap(), content_after_first);
}

#[tokio::test]
async fn create_branch_and_switch_branch_isolate_subsequent_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let user_id = store.add_user_message(UserContent::Text("hi".to_string()), vec![]).await.unwrap();

    let branch_id = store.create_branch(&user_id).unwrap();
    store.switch_branch(&branch_id).unwrap();
    store.add_assistant_message().unwrap();

    assert_eq!(store.thread().unwrap().messages.len(), 3);

    let original_thread_id = store.current_thread_id().unwrap().to_string();
    store.switch_thread(&original_thread_id).unwrap();
    assert_eq!(store.thread().unwrap().messages.len(), 2);
}

#[tokio::test]
async fn operations_on_an_unknown_thread_fail_with_unknown_thread() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let mut store = ThreadStore::new(workspace);

    let err = store.switch_thread("ghost").unwrap_err();
    assert!(matches!(err, StoreError::UnknownThread { .. }));

    let err = store.add_user_message(UserContent::Text("hi".to_string()), vec![]).await.unwrap_err();
    assert!(matches!(err, StoreError::NoActiveThread { .. }));
}

#[tokio::test]
async fn thread_mut_allows_in_place_compression_state_edits() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.add_user_message(UserContent::Text("hi".to_string()), vec![]).await.unwrap();

    store.thread_mut().unwrap().compression_state.achieved_level = Some("L1".to_string());
    assert_eq!(store.thread().unwrap().compression_state.achieved_level.as_deref(), Some("L1"));

    let stats = CompressionStats { tokens_before: 100, tokens_after: 40, messages_before: 4, messages_after: 2 };
    let mut events = store.subscribe();
    store.notify_compacted(stats).unwrap();
    let notification = events.try_recv().unwrap();
    assert!(matches!(notification.event, ThreadEvent::Compacted { .. }));
}

#[tokio::test]
async fn persist_then_restore_recovers_thread_state() {
    let dir = tempfile::tempdir().unwrap();
    let thread_id;
    {
        let mut store = store_in(&dir);
        thread_id = store.current_thread_id().unwrap().to_string();
        store.add_user_message(UserContent::Text("hello".to_string()), vec![]).await.unwrap();
        store.persist().await.unwrap();
    }

    let workspace = WorkspaceGateway::new(dir.path());
    let mut restored = ThreadStore::new(workspace);
    restored.restore().await.unwrap();

    assert_eq!(restored.current_thread_id(), Some(thread_id.as_str()));
    restored.switch_thread(&thread_id).unwrap();
    assert_eq!(restored.thread().unwrap().messages.len(), 2);
}

#[tokio::test]
async fn restore_of_a_fresh_workspace_leaves_the_store_empty() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let mut store = ThreadStore::new(workspace);
    store.restore().await.unwrap();
    assert!(store.thread_ids().is_empty());
}

#[tokio::test]
async fn to_document_derives_checkpoint_index_from_thread_messages() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let thread_id = store.current_thread_id().unwrap().to_string();
    store.add_user_message(UserContent::Text("hello".to_string()), vec![]).await.unwrap();

    let doc = store.to_document();
    assert_eq!(doc.message_checkpoints.get(&thread_id).map(|v| v.len()), Some(1));
}
