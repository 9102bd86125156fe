use super::*;
use std::path::PathBuf;

#[test]
fn overrides_leave_unset_fields_at_base_value() {
    let base = EngineConfig::with_workspace_root(PathBuf::from("/workspace"));
    let overrides = ConfigOverrides::new().with_max_tool_loops(5);
    let snapshot = base.with_overrides(&overrides);

    assert_eq!(snapshot.loop_config.max_tool_loops, 5);
    assert_eq!(
        snapshot.tools.auto_approve.edits,
        base.tools.auto_approve.edits
    );
}

#[test]
fn applying_overrides_does_not_mutate_the_base_config() {
    let base = EngineConfig::with_workspace_root(PathBuf::from("/workspace"));
    let overrides = ConfigOverrides::new().with_auto_approve_edits(true);
    let _snapshot = base.with_overrides(&overrides);
    assert!(!base.tools.auto_approve.edits);
}
