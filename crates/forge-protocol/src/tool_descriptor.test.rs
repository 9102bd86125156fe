use super::*;

#[test]
fn descriptor_serde_round_trip() {
    let descriptor = ToolDescriptor {
        name: "run_command".to_string(),
        description: "Run a shell command".to_string(),
        parameters_schema: serde_json::json!({"type": "object"}),
        approval_class: ApprovalClass::Terminal,
        mutation_kind: MutationKind::Mutating,
        concurrency_class: ConcurrencyClass::Sequential,
    };
    let json = serde_json::to_string(&descriptor).unwrap();
    let back: ToolDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(back.name, "run_command");
    assert_eq!(back.approval_class, ApprovalClass::Terminal);
}

#[test]
fn dangerous_class_is_distinct_from_terminal() {
    assert_ne!(ApprovalClass::Dangerous, ApprovalClass::Terminal);
}
