use super::*;
use strum::IntoEnumIterator;

#[test]
fn test_status_code_values() {
    assert_eq!(StatusCode::Success as i32, 00_000);
    assert_eq!(StatusCode::Unknown as i32, 01_000);
    assert_eq!(StatusCode::ValidationFailed as i32, 02_000);
    assert_eq!(StatusCode::WorkspaceBoundaryViolation as i32, 03_000);
    assert_eq!(StatusCode::StreamTimeout as i32, 04_000);
    assert_eq!(StatusCode::ProviderRetryable as i32, 05_000);
    assert_eq!(StatusCode::ToolHandlerFailed as i32, 06_000);
    assert_eq!(StatusCode::IoError as i32, 07_000);
    assert_eq!(StatusCode::InvariantViolation as i32, 08_000);
    assert_eq!(StatusCode::LoopDetected as i32, 09_000);
}

#[test]
fn test_is_success() {
    assert!(StatusCode::is_success(0));
    assert!(!StatusCode::is_success(01_000));
}

#[test]
fn test_is_retryable() {
    assert!(StatusCode::ProviderRetryable.is_retryable());
    assert!(StatusCode::StreamTimeout.is_retryable());
    assert!(StatusCode::ToolTimeout.is_retryable());
    assert!(!StatusCode::ValidationFailed.is_retryable());
    assert!(!StatusCode::ApprovalDenied.is_retryable());
}

#[test]
fn test_should_log_error() {
    assert!(StatusCode::Unknown.should_log_error());
    assert!(StatusCode::Internal.should_log_error());
    assert!(!StatusCode::ValidationFailed.should_log_error());
}

#[test]
fn test_display_and_name() {
    assert_eq!(format!("{}", StatusCode::Success), "Success");
    assert_eq!(StatusCode::LoopDetected.name(), "LoopDetected");
}

#[test]
fn test_category() {
    assert_eq!(StatusCode::Success.category(), StatusCategory::Success);
    assert_eq!(
        StatusCode::ApprovalDenied.category(),
        StatusCategory::Policy
    );
    assert_eq!(
        StatusCode::BudgetExceeded.category(),
        StatusCategory::Budget
    );
}

#[test]
fn test_metadata_consistency() {
    for code in StatusCode::iter() {
        let meta = code.meta();
        let value = code as i32;

        match meta.category {
            StatusCategory::Success => assert_eq!(value, 0),
            StatusCategory::Internal => assert!((01_000..02_000).contains(&value)),
            StatusCategory::Validation => assert!((02_000..03_000).contains(&value)),
            StatusCategory::Policy => assert!((03_000..04_000).contains(&value)),
            StatusCategory::Timeout => assert!((04_000..05_000).contains(&value)),
            StatusCategory::Provider => assert!((05_000..06_000).contains(&value)),
            StatusCategory::ToolExecution => assert!((06_000..07_000).contains(&value)),
            StatusCategory::Resource => assert!((07_000..08_000).contains(&value)),
            StatusCategory::State => assert!((08_000..09_000).contains(&value)),
            StatusCategory::Budget => assert!((09_000..10_000).contains(&value)),
        }
    }
}

#[test]
fn test_round_trip_from_i32() {
    for code in StatusCode::iter() {
        let value = code as i32;
        assert_eq!(StatusCode::from_i32(value), Some(code));
    }
    assert_eq!(StatusCode::from_i32(99_999), None);
}
