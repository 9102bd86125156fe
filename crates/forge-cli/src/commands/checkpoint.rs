//! `forge checkpoint ...`: C6 rollback over a thread's checkpoint
//! messages, driven from outside a live agent loop.

use crate::engine::Engine;

pub async fn rollback(engine: &mut Engine, thread_id: &str, message_id: &str) -> anyhow::Result<()> {
    engine.store.switch_thread(thread_id)?;
    let restored = engine.store.rollback_to(message_id).await?;
    engine.persist().await?;
    println!("restored {restored} file(s); thread truncated to {message_id}");
    Ok(())
}

#[cfg(test)]
#[path = "checkpoint.test.rs"]
mod tests;
