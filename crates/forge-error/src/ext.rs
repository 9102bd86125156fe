//! Extension trait implemented by every crate-boundary error enum, plus a
//! couple of small helpers for wrapping foreign errors that don't carry a
//! `StatusCode` of their own.

use std::error::Error as StdError;
use std::fmt;

use crate::StatusCode;

/// Common behavior every error taxonomy member exposes.
///
/// Crates define their own `Snafu`-derived enum for their failure domain
/// (`ToolError`, `StoreError`, ...) and implement this trait over it so
/// callers at a component boundary can classify the error without matching
/// on every variant.
pub trait ErrorExt: StdError {
    /// The status code this error maps to.
    fn status_code(&self) -> StatusCode;

    /// Whether retrying the operation that produced this error is expected
    /// to succeed without caller intervention.
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// Downcast support for callers that need the concrete type back.
    fn as_any(&self) -> &dyn std::any::Any;

    /// A message safe to surface to the end user: internal-category errors
    /// are replaced with a generic "internal error: <code>" message so
    /// implementation details never leak past a turn boundary (§7 "every
    /// terminal error produces a ... human-readable reason").
    fn output_msg(&self) -> String {
        use crate::StatusCategory;
        match self.status_code().category() {
            StatusCategory::Internal | StatusCategory::State => {
                format!("Internal error: {}", self.status_code() as i32)
            }
            _ => self.to_string(),
        }
    }
}

/// A minimal, ad-hoc error carrying just a message and a status code, for
/// call sites that need to produce an `ErrorExt` value without defining a
/// dedicated enum variant.
#[derive(Debug)]
pub struct PlainError {
    message: String,
    code: StatusCode,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl PlainError {
    pub fn new(message: impl Into<String>, code: StatusCode) -> Self {
        Self {
            message: message.into(),
            code,
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        code: StatusCode,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            code,
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for PlainError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl ErrorExt for PlainError {
    fn status_code(&self) -> StatusCode {
        self.code
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Wrap a foreign error (one that doesn't implement [`ErrorExt`]) with a
/// [`StatusCode`], for crossing into code that expects the trait.
pub fn boxed(
    source: impl StdError + Send + Sync + 'static,
    code: StatusCode,
) -> PlainError {
    PlainError::with_source(source.to_string(), code, source)
}

#[cfg(test)]
#[path = "ext.test.rs"]
mod tests;
