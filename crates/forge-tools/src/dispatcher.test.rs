use forge_workspace::WorkspaceGateway;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::builtin::register_builtins;

fn prepared(id: &str, name: &str, raw_arguments: &str) -> PreparedCall {
    PreparedCall {
        id: id.to_string(),
        name: name.to_string(),
        raw_arguments: raw_arguments.to_string(),
        explicitly_approved: false,
        explicitly_denied: false,
    }
}

fn dispatcher() -> ToolDispatcher {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry);
    ToolDispatcher::new(registry)
}

#[tokio::test]
async fn executes_read_only_calls_immediately() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "hi").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let auto_approve = AutoApproveConfig::default();

    let calls = vec![prepared("call_1", "read_file", r#"{"path":"a.txt"}"#)];
    let outcomes = dispatcher().dispatch(&calls, &workspace, &auto_approve, 5_000, &CancellationToken::new()).await;

    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        CallOutcome::Executed(outcome) => assert_eq!(outcome.content, "hi"),
        other => panic!("expected Executed, got {other:?}"),
    }
}

#[tokio::test]
async fn edits_without_auto_approve_halt_pending() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let auto_approve = AutoApproveConfig::default();

    let calls = vec![prepared("call_1", "write_file", r#"{"path":"a.txt","content":"x"}"#)];
    let outcomes = dispatcher().dispatch(&calls, &workspace, &auto_approve, 5_000, &CancellationToken::new()).await;

    assert!(matches!(outcomes[0], CallOutcome::PendingApproval { .. }));
    assert!(!dir.path().join("a.txt").exists());
}

#[tokio::test]
async fn auto_approved_edits_execute() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let auto_approve = AutoApproveConfig { edits: true, terminal: false };

    let calls = vec![prepared("call_1", "write_file", r#"{"path":"a.txt","content":"x"}"#)];
    let outcomes = dispatcher().dispatch(&calls, &workspace, &auto_approve, 5_000, &CancellationToken::new()).await;

    assert!(matches!(outcomes[0], CallOutcome::Executed(_)));
    assert_eq!(tokio::fs::read_to_string(dir.path().join("a.txt")).await.unwrap(), "x");
}

#[tokio::test]
async fn malformed_arguments_are_invalid_params() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let auto_approve = AutoApproveConfig::default();

    let calls = vec![prepared("call_1", "read_file", "{not json")];
    let outcomes = dispatcher().dispatch(&calls, &workspace, &auto_approve, 5_000, &CancellationToken::new()).await;

    assert!(matches!(outcomes[0], CallOutcome::InvalidParams(_)));
}

#[tokio::test]
async fn unknown_tool_is_failed() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let auto_approve = AutoApproveConfig::default();

    let calls = vec![prepared("call_1", "delete_everything", "{}")];
    let outcomes = dispatcher().dispatch(&calls, &workspace, &auto_approve, 5_000, &CancellationToken::new()).await;

    assert!(matches!(outcomes[0], CallOutcome::Failed(_)));
}

#[tokio::test]
async fn explicit_denial_short_circuits_execution() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let auto_approve = AutoApproveConfig { edits: true, terminal: false };

    let mut call = prepared("call_1", "write_file", r#"{"path":"a.txt","content":"x"}"#);
    call.explicitly_denied = true;
    let outcomes = dispatcher().dispatch(&[call], &workspace, &auto_approve, 5_000, &CancellationToken::new()).await;

    assert!(matches!(outcomes[0], CallOutcome::Failed(_)));
    assert!(!dir.path().join("a.txt").exists());
}

#[tokio::test]
async fn parallel_reads_all_execute_in_one_batch() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "a").await.unwrap();
    tokio::fs::write(dir.path().join("b.txt"), "b").await.unwrap();
    let workspace = WorkspaceGateway::new(dir.path());
    let auto_approve = AutoApproveConfig::default();

    let calls = vec![
        prepared("call_1", "read_file", r#"{"path":"a.txt"}"#),
        prepared("call_2", "read_file", r#"{"path":"b.txt"}"#),
    ];
    let outcomes = dispatcher().dispatch(&calls, &workspace, &auto_approve, 5_000, &CancellationToken::new()).await;

    assert!(outcomes.iter().all(|o| matches!(o, CallOutcome::Executed(_))));
}
