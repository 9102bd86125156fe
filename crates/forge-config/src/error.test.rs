use super::*;

#[test]
fn parse_error_maps_to_validation_failed() {
    let source = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
    let err = ConfigError::Parse {
        path: PathBuf::from("forge.toml"),
        source,
        location: Location::new(file!(), line!(), column!()),
    };
    assert_eq!(err.status_code(), StatusCode::ValidationFailed);
}
