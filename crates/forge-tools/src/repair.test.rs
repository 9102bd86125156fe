use super::*;

#[test]
fn leaves_valid_json_unchanged() {
    let raw = r#"{"path": "a.rs", "content": "line"}"#;
    assert_eq!(repair_json(raw), raw);
}

#[test]
fn escapes_literal_newline_inside_string() {
    let raw = "{\"content\": \"line one\nline two\"}";
    let repaired = repair_json(raw);
    assert!(serde_json::from_str::<serde_json::Value>(&repaired).is_ok());
    assert_eq!(repaired, "{\"content\": \"line one\\nline two\"}");
}

#[test]
fn drops_trailing_comma_before_closing_brace() {
    let raw = r#"{"a": 1, "b": 2,}"#;
    let repaired = repair_json(raw);
    assert!(serde_json::from_str::<serde_json::Value>(&repaired).is_ok());
}

#[test]
fn parse_tolerant_repairs_malformed_input() {
    let raw = "{\"path\": \"a.rs\", \"content\": \"x\ny\",}";
    let value = parse_tolerant(raw).expect("should repair and parse");
    assert_eq!(value["path"], "a.rs");
    assert_eq!(value["content"], "x\ny");
}

#[test]
fn parse_tolerant_passes_through_valid_json() {
    let raw = r#"{"path": "a.rs"}"#;
    let value = parse_tolerant(raw).unwrap();
    assert_eq!(value["path"], "a.rs");
}
