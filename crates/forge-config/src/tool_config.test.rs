use super::*;

#[test]
fn default_ignores_common_build_directories() {
    let config = ToolConfig::default();
    assert!(config.ignored_directories.contains(&"target".to_string()));
    assert!(config.ignored_directories.contains(&".git".to_string()));
}

#[test]
fn auto_approve_defaults_to_off() {
    let config = AutoApproveConfig::default();
    assert!(!config.edits);
    assert!(!config.terminal);
}
