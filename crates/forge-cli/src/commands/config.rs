//! `forge config show`: print the resolved layered configuration
//! (defaults, `forge.toml`, environment) for a workspace (§6).

use crate::engine::Engine;

pub fn show(engine: &Engine) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&engine.config)?);
    Ok(())
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
