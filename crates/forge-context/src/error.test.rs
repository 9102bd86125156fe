use super::*;

#[test]
fn summarization_failure_is_retryable_classified() {
    let err = SummarizationFailedSnafu { reason: "timeout".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ProviderRetryable);
}

#[test]
fn message_not_found_is_unknown_entity() {
    let err = MessageNotFoundSnafu { message_id: "msg_1".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::UnknownEntity);
}
