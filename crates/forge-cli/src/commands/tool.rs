//! `forge tool ...`: inspect the C5 registry and dispatch a single call
//! directly against the workspace gateway, for debugging a tool without
//! a model driving it.

use tokio_util::sync::CancellationToken;

use forge_tools::CallOutcome;
use forge_tools::PreparedCall;

use crate::engine::Engine;

pub fn list(engine: &Engine) -> anyhow::Result<()> {
    for descriptor in engine.dispatcher.registry().descriptors() {
        println!(
            "{:<16} approval={:<10?} mutation={:<10?} concurrency={:?}",
            descriptor.name, descriptor.approval_class, descriptor.mutation_kind, descriptor.concurrency_class
        );
    }
    Ok(())
}

pub async fn run(engine: &mut Engine, name: &str, arguments: String) -> anyhow::Result<()> {
    // Typing `forge tool run` is itself the explicit sign-off §4.5 asks
    // for, including for `dangerous` tools, which otherwise never
    // auto-approve.
    let call = PreparedCall {
        id: format!("cli_{}", uuid::Uuid::new_v4()),
        name: name.to_string(),
        raw_arguments: arguments,
        explicitly_approved: true,
        explicitly_denied: false,
    };
    let auto_approve = engine.config.tools.auto_approve;
    let timeout_ms = engine.config.loop_config.tool_timeout_ms;
    let cancel = CancellationToken::new();
    let outcomes = engine.dispatcher.dispatch(std::slice::from_ref(&call), engine.store.workspace(), &auto_approve, timeout_ms, &cancel).await;

    match outcomes.into_iter().next().expect("dispatch returns one outcome per call") {
        CallOutcome::Executed(result) => {
            println!("{}", result.content);
            if !result.mutations.is_empty() {
                engine.persist().await?;
            }
        }
        CallOutcome::InvalidParams(message) => anyhow::bail!("invalid params: {message}"),
        CallOutcome::PendingApproval { descriptor, .. } => {
            anyhow::bail!("`{}` requires approval (class {:?}); this command always approves explicitly, so this should not happen", descriptor.name, descriptor.approval_class)
        }
        CallOutcome::Failed(source) => anyhow::bail!("{source}"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "tool.test.rs"]
mod tests;
