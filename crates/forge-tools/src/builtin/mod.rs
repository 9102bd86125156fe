//! Concrete builtin tools (SPEC_FULL §4.5): the tool set a complete
//! implementation needs beyond the examples spec.md names by name
//! (`read_file`, `write_file`, `search_files`, `run_command`).

mod edit_file;
mod glob_files;
mod http_get;
mod list_directory;
mod lsp_query;
mod read_file;
mod run_command;
mod search_files;
mod write_file;

pub use edit_file::EditFileTool;
pub use glob_files::GlobFilesTool;
pub use http_get::HttpGetTool;
pub use list_directory::ListDirectoryTool;
pub use lsp_query::LspQueryTool;
pub use read_file::ReadFileTool;
pub use run_command::RunCommandTool;
pub use search_files::SearchFilesTool;
pub use write_file::WriteFileTool;

use crate::registry::ToolRegistry;

/// Register every builtin tool into a fresh registry (§4.5).
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(std::sync::Arc::new(ReadFileTool::new()));
    registry.register(std::sync::Arc::new(WriteFileTool::new()));
    registry.register(std::sync::Arc::new(EditFileTool::new()));
    registry.register(std::sync::Arc::new(ListDirectoryTool::new()));
    registry.register(std::sync::Arc::new(SearchFilesTool::new()));
    registry.register(std::sync::Arc::new(GlobFilesTool::new()));
    registry.register(std::sync::Arc::new(RunCommandTool::new()));
    registry.register(std::sync::Arc::new(HttpGetTool::new()));
    registry.register(std::sync::Arc::new(LspQueryTool::new()));
}
