//! The resolved, immutable configuration snapshot an agent loop runs
//! with (§6).
//!
//! Mirrors the teacher's `Config`/`ConfigOverrides` split: a file-backed
//! [`EngineConfig`] is loaded once per process via
//! [`crate::loader::ConfigLoader`], then re-snapshotted per turn with
//! [`ConfigOverrides`] applied on top so a running turn never observes a
//! config change mid-flight.

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::context_config::ContextConfig;
use crate::loop_config::LoopConfig;
use crate::tool_config::ToolConfig;

/// Complete runtime configuration snapshot for one agent loop (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub loop_config: LoopConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub tools: ToolConfig,
    /// Root directory all workspace gateway operations are confined to.
    /// Never read from `forge.toml` itself — always set by the loader
    /// from the directory the file was found in.
    #[serde(default)]
    pub workspace_root: PathBuf,
}

impl EngineConfig {
    pub fn with_workspace_root(workspace_root: PathBuf) -> Self {
        Self {
            loop_config: LoopConfig::default(),
            context: ContextConfig::default(),
            tools: ToolConfig::default(),
            workspace_root,
        }
    }

    /// Apply overrides, producing the per-turn snapshot the loop
    /// actually runs with. The base config is left untouched so the
    /// next turn starts from the unmodified file-backed values again.
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> EngineConfig {
        let mut snapshot = self.clone();
        if let Some(max_tool_loops) = overrides.max_tool_loops {
            snapshot.loop_config.max_tool_loops = max_tool_loops;
        }
        if let Some(enable_auto_fix) = overrides.enable_auto_fix {
            snapshot.loop_config.enable_auto_fix = enable_auto_fix;
        }
        if let Some(auto_approve_edits) = overrides.auto_approve_edits {
            snapshot.tools.auto_approve.edits = auto_approve_edits;
        }
        if let Some(auto_approve_terminal) = overrides.auto_approve_terminal {
            snapshot.tools.auto_approve.terminal = auto_approve_terminal;
        }
        if let Some(max_context_tokens) = overrides.max_context_tokens {
            snapshot.context.max_context_tokens = max_context_tokens;
        }
        snapshot
    }
}

/// Runtime overrides applied on top of the loaded [`EngineConfig`]
/// (e.g. CLI flags, a per-session setting toggled from the host UI).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_tool_loops: Option<u32>,
    pub enable_auto_fix: Option<bool>,
    pub auto_approve_edits: Option<bool>,
    pub auto_approve_terminal: Option<bool>,
    pub max_context_tokens: Option<u32>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tool_loops(mut self, value: u32) -> Self {
        self.max_tool_loops = Some(value);
        self
    }

    pub fn with_auto_approve_edits(mut self, value: bool) -> Self {
        self.auto_approve_edits = Some(value);
        self
    }

    pub fn with_auto_approve_terminal(mut self, value: bool) -> Self {
        self.auto_approve_terminal = Some(value);
        self
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
