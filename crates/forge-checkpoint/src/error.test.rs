use super::*;

#[test]
fn partial_rollback_is_classified_as_an_invariant_violation() {
    let err = CheckpointError::PartialRollback {
        restored: 2,
        total: 5,
        location: Location::new(file!(), line!(), column!()),
    };
    assert_eq!(err.status_code(), StatusCode::InvariantViolation);
    assert!(err.status_code().should_log_error());
}
