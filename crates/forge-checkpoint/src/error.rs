use std::any::Any;

use forge_error::ErrorExt;
use forge_error::Location;
use forge_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CheckpointError {
    #[snafu(display("no checkpoint found for message {message_id}"))]
    NotFound {
        message_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("restoring snapshot for {path} failed: {source}"))]
    RestoreFailed {
        path: String,
        source: forge_workspace::WorkspaceError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("rollback aborted partway through: {restored} of {total} files restored before the failure"))]
    PartialRollback {
        restored: usize,
        total: usize,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for CheckpointError {
    fn status_code(&self) -> StatusCode {
        match self {
            CheckpointError::NotFound { .. } => StatusCode::UnknownEntity,
            CheckpointError::RestoreFailed { .. } => StatusCode::IoError,
            CheckpointError::PartialRollback { .. } => StatusCode::InvariantViolation,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, CheckpointError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
