//! Approval and workspace-boundary tunables for the tool dispatcher and
//! workspace gateway (§5, §6).

use serde::Deserialize;
use serde::Serialize;

/// Auto-approval toggles, one per [`forge_protocol::ApprovalClass`] that
/// supports auto-approval. `Dangerous` has no toggle: it always requires
/// explicit approval (§5 invariant).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AutoApproveConfig {
    #[serde(default)]
    pub edits: bool,
    #[serde(default)]
    pub terminal: bool,
}

/// Workspace and tool-policy tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub auto_approve: AutoApproveConfig,
    /// Directories excluded from `search_files`/`get_dir_tree` regardless
    /// of `.gitignore` contents.
    #[serde(default = "default_ignored_directories")]
    pub ignored_directories: Vec<String>,
    /// `run_command` subcommand allowlist for `git`; empty means no
    /// restriction beyond the general command allowlist.
    #[serde(default)]
    pub allowed_git_subcommands: Vec<String>,
}

fn default_ignored_directories() -> Vec<String> {
    vec![
        ".git".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
        ".venv".to_string(),
    ]
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            auto_approve: AutoApproveConfig::default(),
            ignored_directories: default_ignored_directories(),
            allowed_git_subcommands: vec![
                "status".to_string(),
                "diff".to_string(),
                "log".to_string(),
                "show".to_string(),
                "branch".to_string(),
            ],
        }
    }
}

#[cfg(test)]
#[path = "tool_config.test.rs"]
mod tests;
