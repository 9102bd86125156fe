//! Concrete workspace gateway operations (§6): the read/write/list/
//! search/exec/http surface every tool call is ultimately routed
//! through.

use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use grep_regex::RegexMatcher;
use grep_searcher::sinks::UTF8;
use grep_searcher::BinaryDetection;
use grep_searcher::SearcherBuilder;
use ignore::WalkBuilder;
use snafu::ResultExt;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

use crate::audit::record_path;
use crate::audit::AuditOp;
use crate::backends::LspBackend;
use crate::backends::SemanticIndex;
use crate::backends::UnsupportedBackend;
use crate::error::CommandDeniedSnafu;
use crate::error::CommandTimeoutSnafu;
use crate::error::HttpSnafu;
use crate::error::IoSnafu;
use crate::error::NotFoundSnafu;
use crate::error::Result;
use crate::error::SensitivePathDeniedSnafu;
use crate::path_policy;

/// One entry returned by [`WorkspaceGateway::list_directory`].
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// One match returned by [`WorkspaceGateway::search_files`].
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub path: PathBuf,
    pub line_number: u64,
    pub line: String,
}

/// Result of [`WorkspaceGateway::run_command`].
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Which top-level commands `run_command` will execute at all, and
/// which `git` subcommands are permitted, independent of tool-level
/// approval (§6, grounded in the teacher's read-only-command
/// allowlist).
#[derive(Debug, Clone)]
pub struct CommandPolicy {
    pub allowed_commands: Vec<String>,
    pub allowed_git_subcommands: Vec<String>,
}

impl Default for CommandPolicy {
    fn default() -> Self {
        Self {
            allowed_commands: vec![
                "ls", "cat", "head", "tail", "wc", "grep", "rg", "find", "pwd", "echo", "git",
                "cargo", "npm", "node", "python", "python3", "pytest", "go", "make",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            allowed_git_subcommands: vec![
                "status", "diff", "log", "show", "branch", "rev-parse", "ls-files",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl CommandPolicy {
    fn check(&self, command: &str, args: &[String]) -> Result<()> {
        if !self.allowed_commands.iter().any(|c| c == command) {
            return CommandDeniedSnafu {
                reason: format!("command `{command}` is not on the allowlist"),
            }
            .fail();
        }
        if command == "git" {
            let subcommand = args.first().map(String::as_str).unwrap_or("");
            if !self
                .allowed_git_subcommands
                .iter()
                .any(|s| s == subcommand)
            {
                return CommandDeniedSnafu {
                    reason: format!("git subcommand `{subcommand}` is not on the allowlist"),
                }
                .fail();
            }
        }
        Ok(())
    }
}

/// The capability surface every tool call is routed through (§6). Bound
/// to a single `workspace_root`; every path argument is resolved and
/// boundary-checked before use.
pub struct WorkspaceGateway {
    workspace_root: PathBuf,
    command_policy: CommandPolicy,
    http_client: reqwest::Client,
    lsp: Arc<dyn LspBackend>,
    semantic: Arc<dyn SemanticIndex>,
}

impl WorkspaceGateway {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            command_policy: CommandPolicy::default(),
            http_client: reqwest::Client::new(),
            lsp: Arc::new(UnsupportedBackend),
            semantic: Arc::new(UnsupportedBackend),
        }
    }

    pub fn with_command_policy(mut self, policy: CommandPolicy) -> Self {
        self.command_policy = policy;
        self
    }

    pub fn with_lsp_backend(mut self, backend: Arc<dyn LspBackend>) -> Self {
        self.lsp = backend;
        self
    }

    pub fn with_semantic_index(mut self, index: Arc<dyn SemanticIndex>) -> Self {
        self.semantic = index;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    fn resolve(&self, candidate: &str) -> Result<PathBuf> {
        path_policy::resolve_within(&self.workspace_root, candidate)
    }

    pub async fn read_text(&self, path: &str) -> Result<String> {
        let resolved = self.resolve(path)?;
        match tokio::fs::read_to_string(&resolved).await {
            Ok(contents) => {
                record_path(AuditOp::Read, &resolved, Ok(()));
                Ok(contents)
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                record_path(AuditOp::Read, &resolved, Err("not found"));
                NotFoundSnafu { path: resolved }.fail()
            }
            Err(source) => {
                record_path(AuditOp::Read, &resolved, Err("io error"));
                IoSnafu { path: resolved, source }.fail()
            }
        }
    }

    pub async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let resolved = self.resolve(path)?;
        match tokio::fs::read(&resolved).await {
            Ok(bytes) => Ok(bytes),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                NotFoundSnafu { path: resolved }.fail()
            }
            Err(source) => Err(source).context(IoSnafu { path: resolved }),
        }
    }

    pub async fn write_text(&self, path: &str, content: &str) -> Result<()> {
        let resolved = self.resolve(path)?;

        if path_policy::is_denied_outright(&resolved) {
            record_path(AuditOp::Write, &resolved, Err("locked directory"));
            return SensitivePathDeniedSnafu { path: resolved }.fail();
        }

        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context(IoSnafu { path: parent.to_path_buf() })?;
        }
        let result = tokio::fs::write(&resolved, content).await;
        record_path(AuditOp::Write, &resolved, result.as_ref().map(|_| ()).map_err(|_| "io error"));
        result.context(IoSnafu { path: resolved })
    }

    pub async fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
        let resolved = self.resolve(path)?;
        let mut read_dir = match tokio::fs::read_dir(&resolved).await {
            Ok(read_dir) => read_dir,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return NotFoundSnafu { path: resolved }.fail();
            }
            Err(source) => return Err(source).context(IoSnafu { path: resolved }),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .context(IoSnafu { path: resolved.clone() })?
        {
            let file_type = entry
                .file_type()
                .await
                .context(IoSnafu { path: resolved.clone() })?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: file_type.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        record_path(AuditOp::List, &resolved, Ok(()));
        Ok(entries)
    }

    /// Recursive, gitignore-aware directory tree, capped at `max_entries`
    /// to bound memory on very large trees.
    pub fn get_dir_tree(&self, path: &str, max_entries: usize) -> Result<Vec<PathBuf>> {
        let resolved = self.resolve(path)?;
        let mut paths = Vec::new();
        for entry in WalkBuilder::new(&resolved).hidden(false).build() {
            let Ok(entry) = entry else { continue };
            if entry.path() == resolved {
                continue;
            }
            paths.push(entry.path().to_path_buf());
            if paths.len() >= max_entries {
                warn!(path = %resolved.display(), max_entries, "directory tree truncated");
                break;
            }
        }
        record_path(AuditOp::List, &resolved, Ok(()));
        Ok(paths)
    }

    /// Regex content search over the workspace tree, respecting
    /// `.gitignore` via the same walker `get_dir_tree` uses.
    pub fn search_files(&self, pattern: &str, path: &str, limit: usize) -> Result<Vec<SearchMatch>> {
        let resolved = self.resolve(path)?;
        let matcher = RegexMatcher::new(pattern)
            .map_err(|_| CommandDeniedSnafu { reason: format!("invalid regex: {pattern}") }.build())?;

        let mut searcher = SearcherBuilder::new()
            .binary_detection(BinaryDetection::quit(b'\x00'))
            .build();

        let mut matches = Vec::new();
        'outer: for entry in WalkBuilder::new(&resolved).hidden(false).build() {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let file_path = entry.path().to_path_buf();
            let search_result = searcher.search_path(
                &matcher,
                &file_path,
                UTF8(|line_number, line| {
                    matches.push(SearchMatch {
                        path: file_path.clone(),
                        line_number,
                        line: line.trim_end().to_string(),
                    });
                    Ok(matches.len() < limit)
                }),
            );
            if search_result.is_err() {
                continue;
            }
            if matches.len() >= limit {
                break 'outer;
            }
        }
        record_path(AuditOp::Search, &resolved, Ok(()));
        Ok(matches)
    }

    pub async fn run_command(
        &self,
        command: &str,
        args: &[String],
        timeout_ms: u64,
    ) -> Result<CommandOutput> {
        self.command_policy.check(command, args).map_err(|err| {
            record_path(AuditOp::Exec, Path::new(command), Err("denied by policy"));
            err
        })?;

        let mut child = Command::new(command)
            .args(args)
            .current_dir(&self.workspace_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context(IoSnafu { path: PathBuf::from(command) })?;

        let mut stdout_pipe = child.stdout.take().expect("piped stdout");
        let mut stderr_pipe = child.stderr.take().expect("piped stderr");

        let run = async {
            let mut stdout = String::new();
            let mut stderr = String::new();
            stdout_pipe.read_to_string(&mut stdout).await.ok();
            stderr_pipe.read_to_string(&mut stderr).await.ok();
            let status = child.wait().await.context(IoSnafu { path: PathBuf::from(command) })?;
            Ok::<_, crate::error::WorkspaceError>(CommandOutput {
                stdout,
                stderr,
                exit_code: status.code().unwrap_or(-1),
            })
        };

        let outcome = timeout(Duration::from_millis(timeout_ms), run).await;
        record_path(
            AuditOp::Exec,
            Path::new(command),
            outcome.as_ref().map(|_| ()).map_err(|_| "timeout"),
        );
        match outcome {
            Ok(result) => result,
            Err(_) => CommandTimeoutSnafu { millis: timeout_ms }.fail(),
        }
    }

    pub async fn http_get(&self, url: &str) -> Result<String> {
        let response = self.http_client.get(url).send().await.context(HttpSnafu)?;
        let body = response.text().await.context(HttpSnafu)?;
        record_path(AuditOp::HttpGet, Path::new(url), Ok(()));
        Ok(body)
    }

    pub async fn lsp_query(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        self.lsp.query(method, params).await
    }

    pub async fn semantic_search(&self, query: &str, limit: usize) -> Result<Vec<serde_json::Value>> {
        self.semantic.search(query, limit).await
    }
}

#[cfg(test)]
#[path = "gateway.test.rs"]
mod tests;
