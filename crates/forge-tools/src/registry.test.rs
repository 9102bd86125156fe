use std::sync::Arc;

use super::*;
use crate::builtin::register_builtins;
use crate::builtin::ReadFileTool;

#[test]
fn register_and_get_round_trips() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ReadFileTool::new()));

    assert!(registry.contains("read_file"));
    assert_eq!(registry.get("read_file").unwrap().descriptor().name, "read_file");
}

#[test]
fn missing_tool_is_not_found() {
    let registry = ToolRegistry::new();
    assert!(!registry.contains("read_file"));
    assert!(registry.get("read_file").is_err());
}

#[test]
fn descriptors_are_sorted_by_name() {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry);

    let names: Vec<String> = registry.descriptors().into_iter().map(|d| d.name).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 9);
}
