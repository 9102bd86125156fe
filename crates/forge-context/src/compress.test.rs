use super::*;
use forge_protocol::ToolCallPart;
use forge_protocol::UserContent;
use chrono::Utc;

fn user(id: &str) -> Message {
    Message::User {
        id: id.to_string(),
        created_at: Utc::now(),
        content: UserContent::Text("hi".to_string()),
        context_items: vec![],
    }
}

fn assistant_with_tool_call(id: &str, args: serde_json::Value) -> Message {
    Message::Assistant {
        id: id.to_string(),
        created_at: Utc::now(),
        content: String::new(),
        parts: vec![AssistantPart::ToolCall {
            tool_call: ToolCallPart {
                id: format!("call_{id}"),
                name: "read_file".to_string(),
                arguments: args,
                params_summary: None,
            },
        }],
        tool_calls: vec![0],
        compacted_at: None,
    }
}

#[test]
fn old_tool_call_arguments_are_replaced_with_a_summary() {
    let mut messages = vec![
        user("u1"),
        assistant_with_tool_call("a1", serde_json::json!({"path": "src/main.rs"})),
        user("u2"),
    ];
    let mut config = ContextConfig::default();
    config.keep_recent_turns = 0;
    let outcome = compress(&mut messages, &config);

    assert_eq!(outcome.tool_calls_compacted, 1);
    let Message::Assistant { parts, .. } = &messages[1] else { panic!() };
    let AssistantPart::ToolCall { tool_call } = &parts[0] else { panic!() };
    assert!(tool_call.arguments.is_null());
    assert!(tool_call.params_summary.is_some());
}

#[test]
fn recent_assistant_messages_within_the_keep_window_are_untouched() {
    let mut messages = vec![user("u1"), assistant_with_tool_call("a1", serde_json::json!({"x": 1}))];
    let mut config = ContextConfig::default();
    config.keep_recent_turns = 1;
    let outcome = compress(&mut messages, &config);

    assert_eq!(outcome.tool_calls_compacted, 0);
    let Message::Assistant { parts, .. } = &messages[1] else { panic!() };
    let AssistantPart::ToolCall { tool_call } = &parts[0] else { panic!() };
    assert!(!tool_call.arguments.is_null());
}

#[test]
fn long_reasoning_parts_are_dropped_and_tool_call_index_rebuilt() {
    let long_reasoning = "word ".repeat(500);
    let mut messages = vec![
        user("u1"),
        Message::Assistant {
            id: "a1".to_string(),
            created_at: Utc::now(),
            content: String::new(),
            parts: vec![
                AssistantPart::Reasoning { text: long_reasoning },
                AssistantPart::Text { text: "ok".to_string() },
                AssistantPart::ToolCall {
                    tool_call: ToolCallPart {
                        id: "call_a1".to_string(),
                        name: "read_file".to_string(),
                        arguments: serde_json::json!({"path": "a.rs"}),
                        params_summary: None,
                    },
                },
            ],
            tool_calls: vec![2],
            compacted_at: None,
        },
        user("u2"),
    ];
    let mut config = ContextConfig::default();
    config.keep_recent_turns = 0;
    let outcome = compress(&mut messages, &config);

    assert_eq!(outcome.reasoning_parts_dropped, 1);
    let Message::Assistant { parts, tool_calls, .. } = &messages[1] else { panic!() };
    assert_eq!(parts.len(), 2);
    assert_eq!(*tool_calls, vec![1]);
}

#[test]
fn short_reasoning_parts_survive() {
    let mut messages = vec![
        user("u1"),
        Message::Assistant {
            id: "a1".to_string(),
            created_at: Utc::now(),
            content: String::new(),
            parts: vec![AssistantPart::Reasoning { text: "brief".to_string() }],
            tool_calls: vec![],
            compacted_at: None,
        },
        user("u2"),
    ];
    let mut config = ContextConfig::default();
    config.keep_recent_turns = 0;
    let outcome = compress(&mut messages, &config);
    assert_eq!(outcome.reasoning_parts_dropped, 0);
}

#[test]
fn already_compacted_assistant_messages_are_left_alone() {
    let mut messages = vec![Message::Assistant {
        id: "a1".to_string(),
        created_at: Utc::now(),
        content: String::new(),
        parts: vec![AssistantPart::ToolCall {
            tool_call: ToolCallPart {
                id: "call_a1".to_string(),
                name: "read_file".to_string(),
                arguments: serde_json::json!({"x": 1}),
                params_summary: None,
            },
        }],
        tool_calls: vec![0],
        compacted_at: Some(Utc::now()),
    }];
    let mut config = ContextConfig::default();
    config.keep_recent_turns = 0;
    let outcome = compress(&mut messages, &config);
    assert_eq!(outcome.tool_calls_compacted, 0);
}
