//! Approval gate (§4.5 "Approval policy"): decides whether a tool call
//! may run immediately or must surface as a pending approval first.

use forge_config::AutoApproveConfig;
use forge_protocol::ApprovalClass;

/// What the dispatcher should do with a call before executing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Run now, no user sign-off needed.
    Execute,
    /// Halt the loop at `awaiting_approval` until the user accepts or
    /// rejects this call.
    RequireApproval,
}

/// Decide whether `class` may run given `auto_approve` and whether the
/// user already explicitly approved this specific call this round.
///
/// `dangerous` never auto-approves regardless of configuration (§4.5
/// invariant); `mcp` delegates to the same `edits`/`terminal` toggles
/// the host exposes for MCP-delegated approval, since this engine has
/// no separate MCP policy surface of its own (§1 "MCP process
/// management" is an external collaborator; whether a given MCP tool
/// needs approval is still this gate's call).
pub fn decide(class: ApprovalClass, auto_approve: &AutoApproveConfig, explicitly_approved: bool) -> ApprovalDecision {
    if explicitly_approved {
        return ApprovalDecision::Execute;
    }
    let auto = match class {
        ApprovalClass::None => true,
        ApprovalClass::Edits => auto_approve.edits,
        ApprovalClass::Terminal => auto_approve.terminal,
        ApprovalClass::Dangerous => false,
        ApprovalClass::Mcp => auto_approve.edits || auto_approve.terminal,
    };
    if auto {
        ApprovalDecision::Execute
    } else {
        ApprovalDecision::RequireApproval
    }
}

#[cfg(test)]
#[path = "approval.test.rs"]
mod tests;
