use super::*;

#[test]
fn event_tag_round_trips() {
    let event = ThreadEvent::TextDelta {
        message_id: "m1".to_string(),
        delta: "hello".to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"text_delta\""));
    let back: ThreadEvent = serde_json::from_str(&json).unwrap();
    matches!(back, ThreadEvent::TextDelta { .. });
}

#[test]
fn turn_complete_has_no_payload() {
    let json = serde_json::to_string(&ThreadEvent::TurnComplete).unwrap();
    assert_eq!(json, r#"{"type":"turn_complete"}"#);
}
