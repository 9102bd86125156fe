use super::*;
use std::path::PathBuf;

#[test]
fn boundary_violation_maps_to_policy_code() {
    let err = WorkspaceError::BoundaryViolation {
        path: PathBuf::from("/etc/passwd"),
        location: Location::new(file!(), line!(), column!()),
    };
    assert_eq!(err.status_code(), StatusCode::WorkspaceBoundaryViolation);
    assert!(!err.is_retryable());
}

#[test]
fn command_timeout_is_retryable() {
    let err = WorkspaceError::CommandTimeout {
        millis: 5000,
        location: Location::new(file!(), line!(), column!()),
    };
    assert!(err.is_retryable());
}
