//! Error taxonomy for the tool dispatcher (C5, §7 "ToolExecutionError",
//! "ValidationError", "PolicyError", "TimeoutError").

use std::any::Any;

use forge_error::ErrorExt;
use forge_error::Location;
use forge_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ToolError {
    #[snafu(display("no tool registered with name {name:?}"))]
    NotFound {
        name: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("parameters for {name:?} failed validation: {message}"))]
    ValidationFailed {
        name: String,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("raw arguments for {name:?} could not be repaired into valid JSON: {message}"))]
    MalformedArguments {
        name: String,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("user declined to approve call to {name:?}"))]
    ApprovalDenied {
        name: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("{source}"))]
    Workspace {
        source: forge_workspace::WorkspaceError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("tool {name:?} exceeded its {millis}ms timeout"))]
    Timeout {
        name: String,
        millis: u64,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("tool {name:?} handler failed: {message}"))]
    HandlerFailed {
        name: String,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("tool {name:?} was cancelled"))]
    Cancelled {
        name: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ToolError {
    fn status_code(&self) -> StatusCode {
        match self {
            ToolError::NotFound { .. } => StatusCode::ToolNotFound,
            ToolError::ValidationFailed { .. } => StatusCode::ValidationFailed,
            ToolError::MalformedArguments { .. } => StatusCode::MalformedToolCall,
            ToolError::ApprovalDenied { .. } => StatusCode::ApprovalDenied,
            ToolError::Workspace { source } => source.status_code(),
            ToolError::Timeout { .. } => StatusCode::ToolTimeout,
            ToolError::HandlerFailed { .. } => StatusCode::ToolHandlerFailed,
            ToolError::Cancelled { .. } => StatusCode::Cancelled,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
