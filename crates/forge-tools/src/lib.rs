//! Tool Dispatcher (C5, §4.5): registry, schema validation, approval
//! gates, the parallel-execution wave planner, and side-effect
//! tracking for builtin workspace tools.

pub mod approval;
pub mod builtin;
pub mod dispatcher;
pub mod error;
pub mod planner;
pub mod registry;
pub mod repair;
pub mod tool;
pub mod validate;

pub use approval::decide;
pub use approval::ApprovalDecision;
pub use builtin::register_builtins;
pub use builtin::EditFileTool;
pub use builtin::GlobFilesTool;
pub use builtin::HttpGetTool;
pub use builtin::ListDirectoryTool;
pub use builtin::LspQueryTool;
pub use builtin::ReadFileTool;
pub use builtin::RunCommandTool;
pub use builtin::SearchFilesTool;
pub use builtin::WriteFileTool;
pub use dispatcher::CallOutcome;
pub use dispatcher::PreparedCall;
pub use dispatcher::ToolDispatcher;
pub use error::Result;
pub use error::ToolError;
pub use planner::plan_waves;
pub use planner::PlannedCall;
pub use registry::ToolRegistry;
pub use repair::repair_json;
pub use tool::BoxedTool;
pub use tool::FileMutation;
pub use tool::ToolCallContext;
pub use tool::ToolHandler;
pub use tool::ToolOutcome;
pub use tool::ToolPreview;
pub use validate::parse_and_validate;
pub use validate::validate_value;
