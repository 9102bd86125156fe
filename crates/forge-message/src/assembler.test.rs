use super::*;
use chrono::Utc;
use forge_protocol::ToolCallPart;
use forge_protocol::ToolResultType;
use forge_protocol::UserContent;

fn user(id: &str, text: &str) -> Message {
    Message::User { id: id.to_string(), created_at: Utc::now(), content: UserContent::Text(text.to_string()), context_items: vec![] }
}

fn assistant_with_call(id: &str) -> Message {
    Message::Assistant {
        id: id.to_string(),
        created_at: Utc::now(),
        content: "I'll read it.".to_string(),
        parts: vec![
            AssistantPart::Text { text: "I'll read it.".to_string() },
            AssistantPart::ToolCall {
                tool_call: ToolCallPart {
                    id: "call_1".to_string(),
                    name: "read_file".to_string(),
                    arguments: serde_json::json!({"path": "src/main.ts"}),
                    params_summary: None,
                },
            },
        ],
        tool_calls: vec![1],
        compacted_at: None,
    }
}

fn tool_result(compacted: bool) -> Message {
    Message::Tool {
        id: "tm1".to_string(),
        created_at: Utc::now(),
        tool_call_id: "call_1".to_string(),
        name: "read_file".to_string(),
        content: "fn main() {}".to_string(),
        result_type: ToolResultType::Success,
        params: None,
        compacted_at: if compacted { Some(Utc::now()) } else { None },
    }
}

fn prompt() -> SystemPromptParts<'static> {
    SystemPromptParts { static_prompt: "base", role_prompt: "" }
}

#[test]
fn single_tool_turn_produces_the_expected_message_sequence() {
    let mut thread = Thread::new("t1");
    thread.messages.push(user("u1", "read src/main.ts"));
    thread.messages.push(assistant_with_call("a1"));
    thread.messages.push(tool_result(false));

    let request = assemble(&thread, &[], &prompt(), &WorkspaceMetadata::default(), None, &[]);
    assert_eq!(request.messages.len(), 4); // system, user, assistant, tool
    assert_eq!(request.messages[0].role, "system");
    assert_eq!(request.messages[1].role, "user");
    assert_eq!(request.messages[2].role, "assistant");
    assert_eq!(request.messages[2].tool_calls.len(), 1);
    assert_eq!(request.messages[2].tool_calls[0].id, "call_1");
    assert_eq!(request.messages[3].role, "tool");
    assert_eq!(request.messages[3].tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(request.messages[3].content, "fn main() {}");
}

#[test]
fn compacted_tool_result_is_replaced_with_the_placeholder() {
    let mut thread = Thread::new("t1");
    thread.messages.push(user("u1", "read it"));
    thread.messages.push(assistant_with_call("a1"));
    thread.messages.push(tool_result(true));

    let request = assemble(&thread, &[], &prompt(), &WorkspaceMetadata::default(), None, &[]);
    assert_eq!(request.messages[3].content, COMPACTED_TOOL_PLACEHOLDER);
}

#[test]
fn compacted_assistant_message_drops_its_tool_calls_and_keeps_only_text() {
    let mut thread = Thread::new("t1");
    let mut assistant = assistant_with_call("a1");
    if let Message::Assistant { compacted_at, .. } = &mut assistant {
        *compacted_at = Some(Utc::now());
    }
    thread.messages.push(assistant);

    let request = assemble(&thread, &[], &prompt(), &WorkspaceMetadata::default(), None, &[]);
    let assistant_message = &request.messages[1];
    assert_eq!(assistant_message.content, "I'll read it.");
    assert!(assistant_message.tool_calls.is_empty());
}

#[test]
fn only_the_latest_user_message_receives_expanded_context() {
    let mut thread = Thread::new("t1");
    thread.messages.push(user("u1", "first"));
    thread.messages.push(user("u2", "second"));

    let expanded = vec![ExpandedItem { path: "a.rs".to_string(), text: "fn a() {}".to_string(), truncated: false, missing: false }];
    let request = assemble(&thread, &expanded, &prompt(), &WorkspaceMetadata::default(), None, &[]);

    assert_eq!(request.messages[1].content, "first");
    assert!(request.messages[2].content.contains("second"));
    assert!(request.messages[2].content.contains("--- a.rs ---"));
}

#[test]
fn checkpoints_are_never_provider_visible() {
    let mut thread = Thread::new("t1");
    thread.messages.push(user("u1", "hi"));
    thread.messages.push(Message::Checkpoint {
        id: "c1".to_string(),
        created_at: Utc::now(),
        kind: forge_protocol::CheckpointKind::UserMessage,
        snapshots: std::collections::HashMap::new(),
    });

    let request = assemble(&thread, &[], &prompt(), &WorkspaceMetadata::default(), None, &[]);
    assert_eq!(request.messages.len(), 2); // system, user
}

#[test]
fn tool_specifications_mirror_the_provided_tool_descriptors() {
    let descriptor = ToolDescriptor {
        name: "read_file".to_string(),
        description: "Reads a file".to_string(),
        parameters_schema: serde_json::json!({"type": "object"}),
        approval_class: forge_protocol::ApprovalClass::None,
        mutation_kind: forge_protocol::MutationKind::ReadOnly,
        concurrency_class: forge_protocol::ConcurrencyClass::ParallelSafe,
    };
    let thread = Thread::new("t1");
    let request = assemble(&thread, &[], &prompt(), &WorkspaceMetadata::default(), None, &[descriptor]);
    assert_eq!(request.tool_specifications.len(), 1);
    assert_eq!(request.tool_specifications[0].name, "read_file");
}
