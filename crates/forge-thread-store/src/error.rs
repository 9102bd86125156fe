use std::any::Any;

use forge_error::ErrorExt;
use forge_error::Location;
use forge_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("no thread with id {thread_id}"))]
    UnknownThread {
        thread_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no branch with id {branch_id}"))]
    UnknownBranch {
        branch_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no message with id {message_id} in the active thread"))]
    MessageNotFound {
        message_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("message {message_id} is not an assistant message"))]
    NotAssistantMessage {
        message_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no thread is active"))]
    NoActiveThread {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("checkpoint operation failed: {source}"))]
    Checkpoint {
        source: forge_checkpoint::CheckpointError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no pending change with id {change_id}"))]
    UnknownPendingChange {
        change_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to read workspace state at {path}: {source}"))]
    PersistRead {
        path: String,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to write workspace state at {path}: {source}"))]
    PersistWrite {
        path: String,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to parse workspace state at {path}: {source}"))]
    PersistParse {
        path: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to serialize workspace state: {source}"))]
    PersistSerialize {
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::UnknownThread { .. } => StatusCode::UnknownEntity,
            StoreError::UnknownBranch { .. } => StatusCode::UnknownEntity,
            StoreError::MessageNotFound { .. } => StatusCode::UnknownEntity,
            StoreError::NotAssistantMessage { .. } => StatusCode::InvariantViolation,
            StoreError::NoActiveThread { .. } => StatusCode::InvariantViolation,
            StoreError::Checkpoint { source, .. } => source.status_code(),
            StoreError::UnknownPendingChange { .. } => StatusCode::UnknownEntity,
            StoreError::PersistRead { .. } => StatusCode::IoError,
            StoreError::PersistWrite { .. } => StatusCode::IoError,
            StoreError::PersistParse { .. } => StatusCode::IoError,
            StoreError::PersistSerialize { .. } => StatusCode::IoError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
