//! Narrow trait seams for capabilities the engine's Non-goals exclude
//! from this crate's own implementation (process-supervised LSP
//! servers, a built semantic index) without removing them from the
//! gateway's public surface (§1 Non-goals, §6).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::error::UnsupportedSnafu;

/// A query against a language server (go-to-definition, references,
/// diagnostics, ...). Left as a seam: supervising an LSP server process
/// and speaking its protocol is out of scope for this crate.
#[async_trait]
pub trait LspBackend: Send + Sync {
    async fn query(&self, method: &str, params: Value) -> Result<Value>;
}

/// A semantic (embedding-based) search over the workspace. Left as a
/// seam: building and maintaining a vector index is out of scope.
#[async_trait]
pub trait SemanticIndex: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Value>>;
}

/// Default backend returned when the host process wires no concrete
/// LSP/semantic-search implementation: every call fails with a
/// `DeniedByPolicy`-classified "unsupported" error rather than
/// panicking or silently no-op'ing.
pub struct UnsupportedBackend;

#[async_trait]
impl LspBackend for UnsupportedBackend {
    async fn query(&self, _method: &str, _params: Value) -> Result<Value> {
        UnsupportedSnafu {
            backend: "lsp_query",
        }
        .fail()
    }
}

#[async_trait]
impl SemanticIndex for UnsupportedBackend {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Value>> {
        UnsupportedSnafu {
            backend: "semantic_search",
        }
        .fail()
    }
}

#[cfg(test)]
#[path = "backends.test.rs"]
mod tests;
