//! Layered configuration loading: defaults, then `forge.toml` in the
//! workspace root, then environment variables (§6 ambient config
//! stack).

use std::path::Path;
use std::path::PathBuf;

use snafu::ResultExt;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::ParseSnafu;
use crate::error::ReadSnafu;
use crate::error::Result;

/// Name of the optional workspace-level config file.
pub const CONFIG_FILE_NAME: &str = "forge.toml";

/// Environment variable overriding `max_tool_loops` without editing the
/// workspace config file.
pub const MAX_TOOL_LOOPS_ENV: &str = "FORGE_MAX_TOOL_LOOPS";

/// Environment variable force-enabling auto-fix.
pub const ENABLE_AUTO_FIX_ENV: &str = "FORGE_ENABLE_AUTO_FIX";

/// Loads an [`EngineConfig`] for a given workspace root, applying (in
/// increasing priority): built-in defaults, `<workspace_root>/forge.toml`
/// if present, then a small set of environment variables. Per-turn
/// overrides are layered on top of the result separately via
/// [`EngineConfig::with_overrides`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `workspace_root`. Missing `forge.toml` is
    /// not an error — the engine runs on defaults.
    pub fn load(workspace_root: impl Into<PathBuf>) -> Result<EngineConfig> {
        let workspace_root = workspace_root.into();
        let mut config = EngineConfig::with_workspace_root(workspace_root.clone());

        let file_path = workspace_root.join(CONFIG_FILE_NAME);
        if let Some(loaded) = Self::load_file(&file_path)? {
            config = loaded;
            config.workspace_root = workspace_root;
        }

        Self::apply_env(&mut config);
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Option<EngineConfig>> {
        if !path.exists() {
            debug!(path = %path.display(), "no workspace config file, using defaults");
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).context(ReadSnafu { path })?;
        let config: EngineConfig = toml::from_str(&contents).context(ParseSnafu { path })?;
        Ok(Some(config))
    }

    fn apply_env(config: &mut EngineConfig) {
        if let Ok(value) = std::env::var(MAX_TOOL_LOOPS_ENV) {
            if let Ok(parsed) = value.parse() {
                config.loop_config.max_tool_loops = parsed;
            }
        }
        if let Ok(value) = std::env::var(ENABLE_AUTO_FIX_ENV) {
            config.loop_config.enable_auto_fix = value == "1" || value.eq_ignore_ascii_case("true");
        }
    }
}

#[cfg(test)]
#[path = "loader.test.rs"]
mod tests;
