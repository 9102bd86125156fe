use super::*;
use std::path::PathBuf;

#[test]
fn dotenv_is_sensitive() {
    assert!(is_sensitive_file(&PathBuf::from("/workspace/.env")));
    assert!(is_sensitive_file(&PathBuf::from("/workspace/.env.production")));
}

#[test]
fn pem_extension_is_sensitive() {
    assert!(is_sensitive_file(&PathBuf::from("/workspace/certs/server.pem")));
}

#[test]
fn ordinary_source_file_is_not_sensitive() {
    assert!(!is_sensitive_file(&PathBuf::from("/workspace/src/main.rs")));
}

#[test]
fn forge_state_directory_is_locked() {
    assert!(is_locked_directory(&PathBuf::from("/workspace/.forge/threads.json")));
}

#[test]
fn git_directory_is_sensitive_not_locked() {
    let path = PathBuf::from("/workspace/.git/config");
    assert!(is_sensitive_directory(&path));
    assert!(!is_locked_directory(&path));
}
