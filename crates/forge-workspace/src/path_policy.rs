//! Resolves user/tool-supplied paths against the workspace root and
//! rejects anything that escapes it (§6 "workspace gateway").

use std::path::Path;
use std::path::PathBuf;

use crate::error::BoundaryViolationSnafu;
use crate::error::Result;
use crate::sensitive_paths;

/// Resolves a candidate path relative to `workspace_root`, rejecting
/// traversal outside it. Does not require the path to exist: a
/// `write_text` call to a new file must still pass this check.
///
/// Absolute paths are accepted only if they already fall under
/// `workspace_root`. Relative paths are joined to `workspace_root`
/// first. `..` components are resolved lexically before the
/// containment check so `a/../../etc/passwd` is rejected even when the
/// target doesn't exist yet (canonicalize alone can't see it).
pub fn resolve_within(workspace_root: &Path, candidate: &str) -> Result<PathBuf> {
    let joined = if Path::new(candidate).is_absolute() {
        PathBuf::from(candidate)
    } else {
        workspace_root.join(candidate)
    };

    let normalized = normalize_lexically(&joined);
    let normalized_root = normalize_lexically(workspace_root);

    if !normalized.starts_with(&normalized_root) {
        return BoundaryViolationSnafu { path: normalized }.fail();
    }

    Ok(normalized)
}

/// Lexically collapses `.`/`..` components without touching the
/// filesystem (so it works for paths that don't exist yet).
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// True when a mutating operation on `path` requires explicit user
/// approval beyond the tool's own `ApprovalClass` (§5, §6).
pub fn requires_elevated_approval(path: &Path) -> bool {
    sensitive_paths::is_sensitive_file(path) || sensitive_paths::is_sensitive_directory(path)
}

/// True when `path` must never be written to, regardless of approval.
pub fn is_denied_outright(path: &Path) -> bool {
    sensitive_paths::is_locked_directory(path)
}

#[cfg(test)]
#[path = "path_policy.test.rs"]
mod tests;
