//! Process-wide tracing setup (§6 ambient logging stack).
//!
//! Two layers share the subscriber: a human-readable `fmt` layer on
//! stderr for everything, and a JSON-lines layer scoped to the
//! `forge_workspace::audit` target that writes to
//! `<workspace_root>/audit.log` — the append-only audit trail every
//! [`forge_workspace::WorkspaceGateway`] operation emits (§6).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Must be kept alive for the process lifetime, or the non-blocking
/// audit-log writer stops flushing.
pub struct TracingGuard {
    _audit_guard: WorkerGuard,
}

pub fn init(workspace_root: &Path) -> TracingGuard {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let audit_log = workspace_root.join("audit.log");
    let file_appender = tracing_appender::rolling::never(
        audit_log.parent().unwrap_or(workspace_root),
        audit_log.file_name().unwrap_or_else(|| "audit.log".as_ref()),
    );
    let (non_blocking, audit_guard) = tracing_appender::non_blocking(file_appender);
    let audit_layer = fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| metadata.target() == "forge_workspace::audit"));

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(env_filter).with(stderr_layer).with(audit_layer).init();

    TracingGuard { _audit_guard: audit_guard }
}
