use super::*;

#[test]
fn missing_context_item_maps_to_file_not_found() {
    let err = MissingContextItemSnafu { path: "src/main.rs".to_string(), reason: "not found".to_string() }.build();
    assert_eq!(err.status_code(), StatusCode::FileNotFound);
}

#[test]
fn oversized_expansion_maps_to_validation_failed() {
    let err = OversizedExpansionSnafu { path: "big.log".to_string(), tokens: 50_000u32 }.build();
    assert_eq!(err.status_code(), StatusCode::ValidationFailed);
}
