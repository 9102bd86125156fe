use super::*;
use chrono::Utc;

fn assistant_with(parts: Vec<AssistantPart>) -> Message {
    Message::Assistant {
        id: "a1".to_string(),
        created_at: Utc::now(),
        content: String::new(),
        parts,
        tool_calls: Vec::new(),
        compacted_at: None,
    }
}

#[test]
fn user_content_as_text_flattens_parts() {
    let content = UserContent::Parts(vec![
        UserContentPart::Text {
            text: "look at this".to_string(),
        },
        UserContentPart::Image {
            url: "file://a.png".to_string(),
            media_type: "image/png".to_string(),
        },
    ]);
    assert_eq!(content.as_text(), "look at this");
}

#[test]
fn message_id_and_created_at_are_uniform_across_variants() {
    let msg = assistant_with(vec![]);
    assert_eq!(msg.id(), "a1");
}

#[test]
fn is_compacted_only_applies_to_assistant_and_tool() {
    let user = Message::User {
        id: "u1".to_string(),
        created_at: Utc::now(),
        content: UserContent::Text("hi".to_string()),
        context_items: vec![],
    };
    assert!(!user.is_compacted());

    let mut assistant = assistant_with(vec![]);
    assert!(!assistant.is_compacted());
    if let Message::Assistant { compacted_at, .. } = &mut assistant {
        *compacted_at = Some(Utc::now());
    }
    assert!(assistant.is_compacted());
}

#[test]
fn serde_round_trip_preserves_variant() {
    let msg = Message::Tool {
        id: "t1".to_string(),
        created_at: Utc::now(),
        tool_call_id: "call_1".to_string(),
        name: "read_file".to_string(),
        content: "contents".to_string(),
        result_type: ToolResultType::Success,
        params: None,
        compacted_at: None,
    };
    let json = serde_json::to_string(&msg).unwrap();
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(msg.id(), back.id());
}
