//! Tool dispatcher (C5, §4.5): ties the registry, validation, approval
//! gate and concurrency planner together into the single entry point
//! the agent loop calls with one assistant turn's batch of tool calls.

use std::collections::HashMap;
use std::time::Duration;

use forge_config::AutoApproveConfig;
use forge_protocol::ToolDescriptor;
use forge_workspace::WorkspaceGateway;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::approval::decide;
use crate::approval::ApprovalDecision;
use crate::error::ApprovalDeniedSnafu;
use crate::error::CancelledSnafu;
use crate::error::Result;
use crate::error::TimeoutSnafu;
use crate::planner::plan_waves;
use crate::planner::PlannedCall;
use crate::registry::ToolRegistry;
use crate::tool::BoxedTool;
use crate::tool::ToolCallContext;
use crate::tool::ToolOutcome;
use crate::validate::parse_and_validate;

/// One tool call as the model emitted it, plus whatever the loop
/// already knows about its approval state this round.
#[derive(Debug, Clone)]
pub struct PreparedCall {
    pub id: String,
    pub name: String,
    pub raw_arguments: String,
    /// Set once the user has explicitly accepted this specific call id
    /// (§4.5 "surface as pending ... halt the loop at awaiting_approval").
    pub explicitly_approved: bool,
    /// Set once the user has explicitly rejected this specific call id.
    pub explicitly_denied: bool,
}

/// What happened to one call in a dispatched batch.
#[derive(Debug)]
pub enum CallOutcome {
    /// Ran to completion (the handler may itself have returned an
    /// application-level error as a tool `content` string; this variant
    /// is for successful handler invocations only).
    Executed(ToolOutcome),
    /// Arguments didn't parse or didn't satisfy the schema (§4.5
    /// "emit a `tool` result with `type = invalid_params`"). The loop
    /// surfaces this text back to the model rather than treating it as
    /// a fatal dispatch error.
    InvalidParams(String),
    /// This call's `approval_class` requires sign-off the current
    /// `AutoApproveConfig` doesn't grant, and the user hasn't already
    /// approved it this round. The loop halts at `awaiting_approval`.
    PendingApproval { descriptor: ToolDescriptor, params: Value },
    /// The handler ran and failed, or the call couldn't be scheduled at
    /// all (unknown tool name, explicit denial, timeout, cancellation).
    Failed(crate::error::ToolError),
}

/// Dispatches batches of tool calls against a fixed registry (§4.5,
/// §9 "static registry keyed by name").
pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Compute a mutating call's dry-run diff preview without running
    /// it, for the approval gate (§4.5). Returns `Ok(None)` for tools
    /// with nothing to preview (read-only, or a preview-ineligible
    /// argument shape); validation/lookup failures surface as errors
    /// the same way they would on an actual dispatch.
    pub async fn preview(
        &self,
        name: &str,
        raw_arguments: &str,
        workspace: &WorkspaceGateway,
        cancel: &CancellationToken,
    ) -> Result<Option<crate::tool::ToolPreview>> {
        let tool = self.registry.get(name)?;
        let params = parse_and_validate(tool.descriptor(), raw_arguments)?;
        let ctx = ToolCallContext { workspace, cancel: cancel.child_token() };
        tool.preview(&params, &ctx).await
    }

    /// Validate, gate and run one turn's batch of calls, preserving
    /// call order in the returned vector regardless of which wave or
    /// completion order each call actually ran in (§4.5 "Results must
    /// be recorded in call order, not completion order").
    pub async fn dispatch(
        &self,
        calls: &[PreparedCall],
        workspace: &WorkspaceGateway,
        auto_approve: &AutoApproveConfig,
        tool_timeout_ms: u64,
        cancel: &CancellationToken,
    ) -> Vec<CallOutcome> {
        let mut outcomes: Vec<Option<CallOutcome>> = calls.iter().map(|_| None).collect();
        let mut ready: HashMap<usize, (BoxedTool, Value)> = HashMap::new();
        let mut planned: Vec<PlannedCall> = Vec::new();

        for (index, call) in calls.iter().enumerate() {
            if call.explicitly_denied {
                outcomes[index] = Some(CallOutcome::Failed(ApprovalDeniedSnafu { name: call.name.clone() }.build()));
                continue;
            }

            let tool = match self.registry.get(&call.name) {
                Ok(tool) => tool,
                Err(source) => {
                    outcomes[index] = Some(CallOutcome::Failed(source));
                    continue;
                }
            };

            let params = match parse_and_validate(tool.descriptor(), &call.raw_arguments) {
                Ok(params) => params,
                Err(source) => {
                    outcomes[index] = Some(CallOutcome::InvalidParams(source.to_string()));
                    continue;
                }
            };

            let decision = decide(tool.descriptor().approval_class, auto_approve, call.explicitly_approved);
            if decision == ApprovalDecision::RequireApproval {
                outcomes[index] =
                    Some(CallOutcome::PendingApproval { descriptor: tool.descriptor().clone(), params });
                continue;
            }

            let target_path = tool.target_path(&params);
            planned.push(PlannedCall { index, concurrency: tool.descriptor().concurrency_class, target_path });
            ready.insert(index, (tool, params));
        }

        let waves = plan_waves(&planned);

        'waves: for wave in waves {
            if cancel.is_cancelled() {
                for index in wave {
                    outcomes[index] = Some(CallOutcome::Failed(
                        CancelledSnafu { name: calls[index].name.clone() }.build(),
                    ));
                }
                continue 'waves;
            }

            let ctx = ToolCallContext { workspace, cancel: cancel.child_token() };
            let running = wave.iter().map(|index| {
                let (tool, params) = ready.get(index).expect("planned calls are always in `ready`");
                run_one(tool.clone(), params.clone(), &ctx, tool_timeout_ms)
            });
            let results = futures::future::join_all(running).await;

            for (index, result) in wave.into_iter().zip(results) {
                outcomes[index] = Some(match result {
                    Ok(outcome) => CallOutcome::Executed(outcome),
                    Err(source) => CallOutcome::Failed(source),
                });
            }
        }

        outcomes.into_iter().map(|outcome| outcome.expect("every call index is assigned exactly one outcome")).collect()
    }
}

async fn run_one(tool: BoxedTool, params: Value, ctx: &ToolCallContext<'_>, timeout_ms: u64) -> Result<ToolOutcome> {
    let name = tool.descriptor().name.clone();
    match tokio::time::timeout(Duration::from_millis(timeout_ms), tool.execute(params, ctx)).await {
        Ok(result) => result,
        Err(_) => TimeoutSnafu { name, millis: timeout_ms }.fail(),
    }
}

#[cfg(test)]
#[path = "dispatcher.test.rs"]
mod tests;
