//! L4 handoff (§4.3): when the thread can't be compressed any further,
//! build a [`HandoffDocument`] and hand the decision to continue in a
//! new thread back to the caller — this crate never creates the new
//! thread itself (that's C1's `create_handoff_session`, §4.1).

use forge_protocol::HandoffDocument;
use forge_protocol::Message;
use forge_protocol::StructuredSummary;
use forge_protocol::Thread;

/// Find the most recent user message's flattened text, used as the
/// handoff's `pending_objective` fallback when the thread has no
/// explicit `pending_objective` set.
fn last_user_text(thread: &Thread) -> Option<String> {
    thread.messages.iter().rev().find_map(|message| match message {
        Message::User { content, .. } => Some(content.as_text()),
        _ => None,
    })
}

/// Build the [`HandoffDocument`] for `thread` given the L3 summary
/// produced over its compressible span. Does not mutate `thread`;
/// the caller is responsible for setting `compression_state.phase =
/// Done`, `handoff_required = true`, and stashing the result.
pub fn build_handoff(thread: &Thread, summary: StructuredSummary) -> HandoffDocument {
    let (pending_objective, pending_steps) = match &thread.pending_objective {
        Some(objective) => (Some(objective.objective.clone()), objective.steps.clone()),
        None => (last_user_text(thread), Vec::new()),
    };

    let mut open_files: Vec<String> = summary.files_in_progress.clone();
    for item in &thread.context_items {
        if !open_files.contains(&item.path) {
            open_files.push(item.path.clone());
        }
    }

    HandoffDocument {
        created_at: summary.created_at,
        summary,
        pending_objective,
        pending_steps,
        open_files,
    }
}

#[cfg(test)]
#[path = "handoff.test.rs"]
mod tests;
