//! Append-only audit trail of workspace gateway operations (§6).
//!
//! There is no separate audit log file: every operation is recorded as
//! a structured `tracing` event at the `forge_workspace::audit` target,
//! so it flows through whatever subscriber the host process installs
//! (file, stdout, OTLP) alongside the rest of the engine's logs.

use std::path::Path;

use tracing::info;

/// Kind of operation performed, for the audit event's `op` field.
#[derive(Debug, Clone, Copy)]
pub enum AuditOp {
    Read,
    Write,
    List,
    Search,
    Exec,
    HttpGet,
}

impl AuditOp {
    fn as_str(&self) -> &'static str {
        match self {
            AuditOp::Read => "read",
            AuditOp::Write => "write",
            AuditOp::List => "list",
            AuditOp::Search => "search",
            AuditOp::Exec => "exec",
            AuditOp::HttpGet => "http_get",
        }
    }
}

pub fn record(op: AuditOp, target: &str, outcome: Result<(), &str>) {
    match outcome {
        Ok(()) => info!(target: "forge_workspace::audit", op = op.as_str(), target = target, "ok"),
        Err(reason) => {
            info!(target: "forge_workspace::audit", op = op.as_str(), target = target, reason, "denied")
        }
    }
}

pub fn record_path(op: AuditOp, path: &Path, outcome: Result<(), &str>) {
    record(op, &path.display().to_string(), outcome);
}

#[cfg(test)]
#[path = "audit.test.rs"]
mod tests;
