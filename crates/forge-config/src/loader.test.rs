use super::*;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigLoader::load(dir.path()).unwrap();
    assert_eq!(config.loop_config.max_tool_loops, 20);
    assert_eq!(config.workspace_root, dir.path());
}

#[test]
fn workspace_toml_overrides_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[loop_config]\nmax_tool_loops = 7\n",
    )
    .unwrap();

    let config = ConfigLoader::load(dir.path()).unwrap();
    assert_eq!(config.loop_config.max_tool_loops, 7);
    assert_eq!(config.workspace_root, dir.path());
}

#[test]
fn env_var_overrides_file_value() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[loop_config]\nmax_tool_loops = 7\n",
    )
    .unwrap();
    std::env::set_var(MAX_TOOL_LOOPS_ENV, "3");

    let config = ConfigLoader::load(dir.path()).unwrap();
    std::env::remove_var(MAX_TOOL_LOOPS_ENV);

    assert_eq!(config.loop_config.max_tool_loops, 3);
}
