//! Shared error classification used across every crate boundary of the
//! orchestration engine.
//!
//! Each crate defines its own `Snafu`-derived error enum for its failure
//! domain and implements [`ErrorExt`] over it, so callers at a component
//! boundary (§7 of the design) can classify failures — retryable vs
//! terminal, user-facing vs internal — without matching every variant.

mod ext;
mod status_code;

pub use ext::ErrorExt;
pub use ext::PlainError;
pub use ext::boxed;
pub use status_code::StatusCategory;
pub use status_code::StatusCode;
pub use status_code::StatusMeta;

/// Call-site location, attached via `#[snafu(implicit)]` on error variants.
pub use snafu::Location;
