//! `forge pending list`: inspect tracked `PendingChange`s (§3, §4.5).

use crate::engine::Engine;

pub fn list(engine: &Engine) -> anyhow::Result<()> {
    let mut any = false;
    for change in engine.store.pending_changes() {
        any = true;
        println!(
            "{} {:<8?} {} (+{} -{}) via {}",
            change.id, change.status, change.file_path, change.lines_added, change.lines_removed, change.tool_name
        );
    }
    if !any {
        println!("no pending changes");
    }
    Ok(())
}

#[cfg(test)]
#[path = "pending.test.rs"]
mod tests;
