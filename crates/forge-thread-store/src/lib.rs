//! Thread Store (C1, §4.1): owns every `Thread`/`Branch`/pending-change
//! and the single mutation surface the rest of the engine goes through.
//! Reachable from any other component, reads nothing from them (§2
//! leaves-first ordering).

mod error;
mod notification;
mod persistence;
mod store;

pub use error::Result;
pub use error::StoreError;
pub use notification::StoreNotification;
pub use persistence::WorkspaceDocument;
pub use persistence::DOCUMENT_SCHEMA_VERSION;
pub use persistence::STATE_FILE_NAME;
pub use store::ThreadStore;
