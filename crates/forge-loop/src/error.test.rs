use forge_error::ErrorExt;
use forge_error::StatusCode;

use super::*;

#[test]
fn loop_detected_maps_to_loop_detected_and_is_not_retryable() {
    let err = LoopDetectedSnafu { reason: "5 identical search_files calls".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::LoopDetected);
    assert!(!err.is_retryable());
}

#[test]
fn budget_exceeded_maps_to_budget_exceeded() {
    let err = BudgetExceededSnafu { max_tool_loops: 20u32 }.build();
    assert_eq!(err.status_code(), StatusCode::BudgetExceeded);
}

#[test]
fn cancelled_maps_to_cancelled() {
    let err = CancelledSnafu {}.build();
    assert_eq!(err.status_code(), StatusCode::Cancelled);
}

#[test]
fn provider_retryable_flag_drives_status_code() {
    let retryable = ProviderSnafu { message: "rate limited".to_string(), retryable: true }.build();
    assert_eq!(retryable.status_code(), StatusCode::ProviderRetryable);
    assert!(retryable.is_retryable());

    let terminal = ProviderSnafu { message: "invalid api key".to_string(), retryable: false }.build();
    assert_eq!(terminal.status_code(), StatusCode::ProviderTerminal);
    assert!(!terminal.is_retryable());
}

#[test]
fn unterminated_tool_call_maps_to_malformed_tool_call() {
    let err = UnterminatedToolCallSnafu { id: "call_1".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::MalformedToolCall);
}

#[test]
fn no_pending_approval_maps_to_invariant_violation() {
    let err = NoPendingApprovalSnafu {}.build();
    assert_eq!(err.status_code(), StatusCode::InvariantViolation);
}
