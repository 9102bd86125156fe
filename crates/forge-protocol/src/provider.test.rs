use super::*;

#[test]
fn tool_call_fragment_allows_absent_name() {
    let event = LlmStreamEvent::ToolCallFragment {
        id: "call_1".to_string(),
        name: None,
        arguments_delta: "{\"pa".to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: LlmStreamEvent = serde_json::from_str(&json).unwrap();
    match back {
        LlmStreamEvent::ToolCallFragment { name, .. } => assert!(name.is_none()),
        _ => panic!("wrong variant"),
    }
}

#[test]
fn error_event_carries_retryable_flag() {
    let event = LlmStreamEvent::Error {
        message: "rate limited".to_string(),
        retryable: true,
    };
    match event {
        LlmStreamEvent::Error { retryable, .. } => assert!(retryable),
        _ => panic!("wrong variant"),
    }
}
