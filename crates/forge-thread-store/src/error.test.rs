use super::*;

#[test]
fn unknown_thread_maps_to_unknown_entity() {
    let err = UnknownThreadSnafu { thread_id: "t1".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::UnknownEntity);
}

#[test]
fn not_assistant_message_maps_to_invariant_violation() {
    let err = NotAssistantMessageSnafu { message_id: "m1".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::InvariantViolation);
}
