use forge_protocol::ApprovalClass;
use forge_protocol::ConcurrencyClass;
use forge_protocol::MutationKind;
use serde_json::json;

use super::*;

fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: "read_file".to_string(),
        description: "read a file".to_string(),
        parameters_schema: json!({
            "type": "object",
            "properties": { "path": { "type": "string" } },
            "required": ["path"],
        }),
        approval_class: ApprovalClass::None,
        mutation_kind: MutationKind::ReadOnly,
        concurrency_class: ConcurrencyClass::ParallelSafe,
    }
}

#[test]
fn valid_arguments_pass() {
    let result = parse_and_validate(&descriptor(), r#"{"path": "a.rs"}"#);
    assert!(result.is_ok());
}

#[test]
fn missing_required_field_fails_validation() {
    let err = parse_and_validate(&descriptor(), "{}").unwrap_err();
    assert!(matches!(err, ToolError::ValidationFailed { .. }));
}

#[test]
fn unparseable_text_is_malformed_not_validation() {
    let err = parse_and_validate(&descriptor(), "not json at all {{{").unwrap_err();
    assert!(matches!(err, ToolError::MalformedArguments { .. }));
}

#[test]
fn repairable_text_parses_then_validates() {
    let result = parse_and_validate(&descriptor(), "{\"path\": \"a.rs\",}");
    assert!(result.is_ok());
}
