use super::*;

#[tokio::test]
async fn unsupported_backend_denies_lsp_queries() {
    let backend = UnsupportedBackend;
    let err = backend.query("textDocument/definition", serde_json::json!({})).await.unwrap_err();
    assert!(matches!(err, crate::error::WorkspaceError::Unsupported { .. }));
}

#[tokio::test]
async fn unsupported_backend_denies_semantic_search() {
    let backend = UnsupportedBackend;
    let err = backend.search("auth middleware", 10).await.unwrap_err();
    assert!(matches!(err, crate::error::WorkspaceError::Unsupported { .. }));
}
