use std::any::Any;
use std::path::PathBuf;

use forge_error::ErrorExt;
use forge_error::Location;
use forge_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WorkspaceError {
    #[snafu(display("path {path:?} resolves outside workspace root"))]
    BoundaryViolation {
        path: PathBuf,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("path {path:?} matches the sensitive-path blocklist"))]
    SensitivePathDenied {
        path: PathBuf,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("path {path:?} does not exist"))]
    NotFound {
        path: PathBuf,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("io error on {path:?}: {source}"))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("command denied by policy: {reason}"))]
    CommandDenied {
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("command timed out after {millis}ms"))]
    CommandTimeout {
        millis: u64,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("http request failed: {source}"))]
    Http {
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("{backend} is not supported by this workspace gateway"))]
    Unsupported {
        backend: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for WorkspaceError {
    fn status_code(&self) -> StatusCode {
        match self {
            WorkspaceError::BoundaryViolation { .. } => StatusCode::WorkspaceBoundaryViolation,
            WorkspaceError::SensitivePathDenied { .. } => StatusCode::SensitivePathDenied,
            WorkspaceError::NotFound { .. } => StatusCode::FileNotFound,
            WorkspaceError::Io { .. } => StatusCode::IoError,
            WorkspaceError::CommandDenied { .. } => StatusCode::DeniedByPolicy,
            WorkspaceError::CommandTimeout { .. } => StatusCode::ToolTimeout,
            WorkspaceError::Http { .. } => StatusCode::ToolHandlerFailed,
            WorkspaceError::Unsupported { .. } => StatusCode::DeniedByPolicy,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
