use super::*;

fn approve(edits: bool, terminal: bool) -> AutoApproveConfig {
    AutoApproveConfig { edits, terminal }
}

#[test]
fn none_class_always_executes() {
    assert_eq!(decide(ApprovalClass::None, &approve(false, false), false), ApprovalDecision::Execute);
}

#[test]
fn edits_requires_approval_unless_auto_approved() {
    assert_eq!(decide(ApprovalClass::Edits, &approve(false, false), false), ApprovalDecision::RequireApproval);
    assert_eq!(decide(ApprovalClass::Edits, &approve(true, false), false), ApprovalDecision::Execute);
}

#[test]
fn terminal_requires_approval_unless_auto_approved() {
    assert_eq!(decide(ApprovalClass::Terminal, &approve(false, false), false), ApprovalDecision::RequireApproval);
    assert_eq!(decide(ApprovalClass::Terminal, &approve(false, true), false), ApprovalDecision::Execute);
}

#[test]
fn dangerous_never_auto_approves() {
    assert_eq!(decide(ApprovalClass::Dangerous, &approve(true, true), false), ApprovalDecision::RequireApproval);
}

#[test]
fn explicit_approval_overrides_everything() {
    assert_eq!(decide(ApprovalClass::Dangerous, &approve(false, false), true), ApprovalDecision::Execute);
}
