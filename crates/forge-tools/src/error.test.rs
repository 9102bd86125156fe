use forge_error::ErrorExt;
use forge_error::StatusCode;

use super::*;

#[test]
fn not_found_maps_to_tool_not_found() {
    let err = NotFoundSnafu { name: "frobnicate".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ToolNotFound);
    assert!(!err.is_retryable());
}

#[test]
fn validation_failed_is_not_retryable() {
    let err = ValidationFailedSnafu { name: "read_file".to_string(), message: "missing path".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ValidationFailed);
    assert!(!err.is_retryable());
}

#[test]
fn timeout_is_classified_retryable() {
    let err = TimeoutSnafu { name: "run_command".to_string(), millis: 60_000u64 }.build();
    assert_eq!(err.status_code(), StatusCode::ToolTimeout);
    assert!(err.is_retryable());
}

#[test]
fn approval_denied_maps_to_policy() {
    let err = ApprovalDeniedSnafu { name: "write_file".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::ApprovalDenied);
}
