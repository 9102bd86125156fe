use std::any::Any;

use forge_error::ErrorExt;
use forge_error::Location;
use forge_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MessageError {
    /// A pinned context item's file could not be read. Non-fatal: the
    /// assembler substitutes an inline error marker (§4.2) rather than
    /// failing the whole request.
    #[snafu(display("context item {path} could not be read: {reason}"))]
    MissingContextItem {
        path: String,
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// A context item's expansion exceeded the per-item token budget
    /// even after truncation was attempted.
    #[snafu(display("expansion of {path} exceeds the per-item budget ({tokens} tokens)"))]
    OversizedExpansion {
        path: String,
        tokens: u32,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for MessageError {
    fn status_code(&self) -> StatusCode {
        match self {
            MessageError::MissingContextItem { .. } => StatusCode::FileNotFound,
            MessageError::OversizedExpansion { .. } => StatusCode::ValidationFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, MessageError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
