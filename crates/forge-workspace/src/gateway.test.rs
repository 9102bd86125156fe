use super::*;

#[tokio::test]
async fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = WorkspaceGateway::new(dir.path());

    gateway.write_text("notes/todo.md", "- write tests").await.unwrap();
    let contents = gateway.read_text("notes/todo.md").await.unwrap();
    assert_eq!(contents, "- write tests");
}

#[tokio::test]
async fn read_outside_workspace_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = WorkspaceGateway::new(dir.path());

    let err = gateway.read_text("../outside.txt").await.unwrap_err();
    assert!(matches!(err, crate::error::WorkspaceError::BoundaryViolation { .. }));
}

#[tokio::test]
async fn write_to_locked_directory_is_denied() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = WorkspaceGateway::new(dir.path());

    let err = gateway.write_text(".forge/threads.json", "{}").await.unwrap_err();
    assert!(matches!(
        err,
        crate::error::WorkspaceError::SensitivePathDenied { .. }
    ));
}

#[tokio::test]
async fn list_directory_sorts_entries() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = WorkspaceGateway::new(dir.path());
    gateway.write_text("b.txt", "b").await.unwrap();
    gateway.write_text("a.txt", "a").await.unwrap();

    let entries = gateway.list_directory(".").await.unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);
}

#[tokio::test]
async fn run_command_denies_commands_off_the_allowlist() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = WorkspaceGateway::new(dir.path());

    let err = gateway
        .run_command("curl", &["http://example.com".to_string()], 5_000)
        .await
        .unwrap_err();
    assert!(matches!(err, crate::error::WorkspaceError::CommandDenied { .. }));
}

#[tokio::test]
async fn run_command_executes_allowed_command() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = WorkspaceGateway::new(dir.path());

    let output = gateway.run_command("echo", &["hi".to_string()], 5_000).await.unwrap();
    assert_eq!(output.stdout.trim(), "hi");
    assert_eq!(output.exit_code, 0);
}

#[tokio::test]
async fn search_files_finds_matching_lines() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = WorkspaceGateway::new(dir.path());
    gateway
        .write_text("src/main.rs", "fn main() {\n    todo!()\n}\n")
        .await
        .unwrap();

    let matches = gateway.search_files("todo!", ".", 10).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].line_number, 2);
}
