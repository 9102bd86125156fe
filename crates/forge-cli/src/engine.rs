//! Wires C1 (thread store), C5 (tool dispatcher/registry) and C6/C8
//! (checkpoint manager / workspace gateway) together for a single
//! workspace root, the way a host process would before handing the
//! result to an `AgentLoop` (forge-loop) together with a concrete LLM
//! provider adapter — out of this crate's scope (§1 "per-provider HTTP
//! adapter details").

use std::path::Path;
use std::path::PathBuf;

use forge_config::ConfigLoader;
use forge_config::EngineConfig;
use forge_thread_store::ThreadStore;
use forge_tools::register_builtins;
use forge_tools::ToolDispatcher;
use forge_tools::ToolRegistry;
use forge_workspace::WorkspaceGateway;

/// Everything a command needs to inspect or drive one workspace.
pub struct Engine {
    pub store: ThreadStore,
    pub dispatcher: ToolDispatcher,
    pub config: EngineConfig,
}

impl Engine {
    /// Load config, restore persisted thread-store state, and register
    /// every builtin tool, for `workspace_root`.
    pub async fn open(workspace_root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let workspace_root = workspace_root.into();
        let config = ConfigLoader::load(workspace_root.clone())?;

        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry);
        let dispatcher = ToolDispatcher::new(registry);

        let workspace = WorkspaceGateway::new(workspace_root);
        let mut store = ThreadStore::new(workspace);
        store.restore().await?;

        Ok(Self { store, dispatcher, config })
    }

    pub async fn persist(&self) -> anyhow::Result<()> {
        self.store.persist().await?;
        Ok(())
    }
}

pub fn resolve_workspace_root(given: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let root = match given {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    Ok(canonicalize_best_effort(&root))
}

fn canonicalize_best_effort(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "engine.test.rs"]
mod tests;
