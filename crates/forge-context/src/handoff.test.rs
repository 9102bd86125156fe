use super::*;
use chrono::Utc;
use forge_protocol::ContextItem;
use forge_protocol::PendingObjective;
use forge_protocol::UserContent;

fn summary() -> StructuredSummary {
    StructuredSummary {
        created_at: Utc::now(),
        completed_tasks: vec![],
        key_decisions: vec![],
        open_questions: vec![],
        files_in_progress: vec!["src/lib.rs".to_string()],
        is_fallback: false,
    }
}

#[test]
fn uses_the_explicit_pending_objective_when_present() {
    let mut thread = Thread::new("t1");
    thread.pending_objective = Some(PendingObjective {
        objective: "migrate the parser".to_string(),
        steps: vec!["update grammar".to_string(), "rerun fixtures".to_string()],
    });
    let doc = build_handoff(&thread, summary());
    assert_eq!(doc.pending_objective.as_deref(), Some("migrate the parser"));
    assert_eq!(doc.pending_steps, vec!["update grammar".to_string(), "rerun fixtures".to_string()]);
}

#[test]
fn falls_back_to_the_last_user_message_when_no_pending_objective() {
    let mut thread = Thread::new("t1");
    thread.messages.push(Message::User {
        id: "u1".to_string(),
        created_at: Utc::now(),
        content: UserContent::Text("finish the migration".to_string()),
        context_items: vec![],
    });
    let doc = build_handoff(&thread, summary());
    assert_eq!(doc.pending_objective.as_deref(), Some("finish the migration"));
    assert!(doc.pending_steps.is_empty());
}

#[test]
fn open_files_merge_summary_files_and_pinned_context_items_without_duplicates() {
    let mut thread = Thread::new("t1");
    thread.context_items.push(ContextItem { id: "c1".to_string(), path: "src/lib.rs".to_string() });
    thread.context_items.push(ContextItem { id: "c2".to_string(), path: "src/main.rs".to_string() });
    let doc = build_handoff(&thread, summary());
    assert_eq!(doc.open_files, vec!["src/lib.rs".to_string(), "src/main.rs".to_string()]);
}
