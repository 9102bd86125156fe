//! Sensitive-path detection for the workspace gateway's write/exec
//! policy (§6).

use std::path::Path;

/// Filename/extension patterns that always require approval before a
/// mutating operation touches them.
const SENSITIVE_FILE_PATTERNS: &[&str] = &[
    ".env",
    "*.pem",
    "*.key",
    "credentials.json",
    ".bashrc",
    ".zshrc",
    ".bash_profile",
    ".gitconfig",
    ".git-credentials",
    ".ssh/config",
    ".ssh/authorized_keys",
    ".npmrc",
    ".pypirc",
];

/// Directories whose contents are always denied for writes, regardless
/// of approval (engine-managed state, not user files).
const LOCKED_DIRECTORIES: &[&str] = &[".forge/"];

/// Directories that require approval for writes but aren't outright
/// denied.
const SENSITIVE_DIRECTORIES: &[&str] = &[".git/", ".vscode/", ".idea/"];

pub fn is_sensitive_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_default();

    for pattern in SENSITIVE_FILE_PATTERNS {
        if matches_pattern(pattern, &path_str, &filename) {
            return true;
        }
    }

    if filename.starts_with(".env.") {
        return true;
    }
    if path_str.contains(".ssh/id_") {
        return true;
    }

    false
}

pub fn is_locked_directory(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    LOCKED_DIRECTORIES.iter().any(|dir| path_str.contains(dir))
}

pub fn is_sensitive_directory(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    SENSITIVE_DIRECTORIES
        .iter()
        .any(|dir| path_str.contains(dir))
}

fn matches_pattern(pattern: &str, full_path: &str, filename: &str) -> bool {
    if pattern.contains('/') {
        return full_path.ends_with(pattern) || full_path.contains(&format!("/{pattern}"));
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return filename.ends_with(suffix);
    }
    filename == pattern
}

#[cfg(test)]
#[path = "sensitive_paths.test.rs"]
mod tests;
