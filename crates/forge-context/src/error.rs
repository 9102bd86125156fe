use std::any::Any;

use forge_error::ErrorExt;
use forge_error::Location;
use forge_error::StatusCode;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ContextError {
    #[snafu(display("summarizer failed to produce a structured summary: {reason}"))]
    SummarizationFailed {
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("message {message_id} referenced for compression was not found in the thread"))]
    MessageNotFound {
        message_id: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ContextError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Summarization failures degrade to a fallback rather than
            // surfacing (§4.3); callers that do propagate this treat it
            // as a retryable provider-class failure.
            ContextError::SummarizationFailed { .. } => StatusCode::ProviderRetryable,
            ContextError::MessageNotFound { .. } => StatusCode::UnknownEntity,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
