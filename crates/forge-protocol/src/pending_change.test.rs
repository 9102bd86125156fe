use super::*;
use crate::snapshot::FileSnapshot;

#[test]
fn pending_change_reports_pending_until_applied() {
    let change = PendingChange {
        id: "pc1".to_string(),
        file_path: "src/lib.rs".to_string(),
        tool_call_id: "call_1".to_string(),
        tool_name: "edit_file".to_string(),
        status: ChangeStatus::Pending,
        snapshot: FileSnapshot::new("src/lib.rs", Some("old".to_string())),
        new_content: Some("new".to_string()),
        change_type: ChangeType::Modify,
        lines_added: 1,
        lines_removed: 1,
    };
    assert!(change.is_pending());

    let mut applied = change;
    applied.status = ChangeStatus::Applied;
    assert!(!applied.is_pending());
}
