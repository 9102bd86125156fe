use super::*;

#[test]
fn relative_path_resolves_under_root() {
    let root = PathBuf::from("/workspace");
    let resolved = resolve_within(&root, "src/main.rs").unwrap();
    assert_eq!(resolved, PathBuf::from("/workspace/src/main.rs"));
}

#[test]
fn traversal_outside_root_is_rejected() {
    let root = PathBuf::from("/workspace");
    let err = resolve_within(&root, "../etc/passwd").unwrap_err();
    assert!(matches!(err, crate::error::WorkspaceError::BoundaryViolation { .. }));
}

#[test]
fn traversal_that_returns_inside_root_is_allowed() {
    let root = PathBuf::from("/workspace");
    let resolved = resolve_within(&root, "src/../src/main.rs").unwrap();
    assert_eq!(resolved, PathBuf::from("/workspace/src/main.rs"));
}

#[test]
fn absolute_path_outside_root_is_rejected() {
    let root = PathBuf::from("/workspace");
    let err = resolve_within(&root, "/etc/passwd").unwrap_err();
    assert!(matches!(err, crate::error::WorkspaceError::BoundaryViolation { .. }));
}
