//! Thread Store (C1, §4.1): the single mutable source of truth for a
//! process's threads, branches, and pending side-effects. Every other
//! component reads or mutates a thread only through this surface.

use std::collections::HashMap;
use std::collections::HashSet;

use forge_protocol::AssistantPart;
use forge_protocol::ChangeStatus;
use forge_protocol::CheckpointKind;
use forge_protocol::CompressionState;
use forge_protocol::CompressionStats;
use forge_protocol::FileSnapshot;
use forge_protocol::Message;
use forge_protocol::PendingChange;
use forge_protocol::StreamPhase;
use forge_protocol::Thread;
use forge_protocol::ThreadEvent;
use forge_protocol::ToolCallPart;
use forge_protocol::ToolCallPatch;
use forge_protocol::ToolResultType;
use forge_protocol::UserContent;
use forge_checkpoint::CheckpointManager;
use forge_workspace::WorkspaceGateway;
use serde_json::Value;
use snafu::OptionExt;
use snafu::ResultExt;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::CheckpointSnafu;
use crate::error::MessageNotFoundSnafu;
use crate::error::NoActiveThreadSnafu;
use crate::error::NotAssistantMessageSnafu;
use crate::error::Result;
use crate::error::UnknownBranchSnafu;
use crate::error::UnknownPendingChangeSnafu;
use crate::error::UnknownThreadSnafu;
use crate::notification::StoreNotification;

/// Broadcast channel depth; a slow subscriber that falls this far behind
/// starts missing notifications rather than stalling the store.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// CRUD surface over threads/branches/pending-changes, plus the outbound
/// event stream every other component subscribes to (§6).
pub struct ThreadStore {
    threads: HashMap<String, Thread>,
    branches: HashMap<String, forge_protocol::Branch>,
    current_thread_id: Option<String>,
    active_branch_id: Option<String>,
    pending_changes: HashMap<String, PendingChange>,
    workspace: WorkspaceGateway,
    events: broadcast::Sender<StoreNotification>,
}

impl ThreadStore {
    pub fn new(workspace: WorkspaceGateway) -> Self {
        let (events, _receiver) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            threads: HashMap::new(),
            branches: HashMap::new(),
            current_thread_id: None,
            active_branch_id: None,
            pending_changes: HashMap::new(),
            workspace,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreNotification> {
        self.events.subscribe()
    }

    pub fn workspace(&self) -> &WorkspaceGateway {
        &self.workspace
    }

    pub fn thread_ids(&self) -> Vec<String> {
        self.threads.keys().cloned().collect()
    }

    pub fn current_thread_id(&self) -> Option<&str> {
        self.current_thread_id.as_deref()
    }

    /// The thread the store currently operates on — the active branch's
    /// thread if one is selected, otherwise the current top-level thread.
    pub fn thread(&self) -> Result<&Thread> {
        self.active_thread()
    }

    /// Mutable access to the active thread, for the context manager's
    /// `run` (§4.3): compaction touches messages, compression state and
    /// token bookkeeping together, so it operates on `Thread` directly
    /// rather than through a per-field store method.
    pub fn thread_mut(&mut self) -> Result<&mut Thread> {
        self.active_thread_mut()
    }

    /// Emit a `Compacted` notification for the active thread, once the
    /// caller has applied a `CompactionOutcome` via [`Self::thread_mut`]
    /// (§6 "compaction" event).
    pub fn notify_compacted(&mut self, stats: CompressionStats) -> Result<()> {
        let label = self.active_label()?;
        self.emit(&label, ThreadEvent::Compacted { stats });
        Ok(())
    }

    /// Publish an arbitrary [`ThreadEvent`] for the active thread.
    ///
    /// Most events are emitted as a side effect of the store call that
    /// produces them (`append_to_assistant`, `add_tool_result`, ...);
    /// this is for the handful the agent loop constructs itself
    /// (`tool_call_completed`, `approval_required`, `turn_complete`,
    /// `cancelled`, `error`) with no corresponding store mutation.
    pub fn emit_event(&self, event: ThreadEvent) -> Result<()> {
        let label = self.active_label()?;
        self.emit(&label, event);
        Ok(())
    }

    fn active_thread(&self) -> Result<&Thread> {
        if let Some(branch_id) = &self.active_branch_id {
            return self
                .branches
                .get(branch_id)
                .map(|branch| &branch.thread)
                .context(UnknownBranchSnafu { branch_id: branch_id.clone() });
        }
        let id = self.current_thread_id.clone().context(NoActiveThreadSnafu)?;
        self.threads.get(&id).context(UnknownThreadSnafu { thread_id: id })
    }

    fn active_thread_mut(&mut self) -> Result<&mut Thread> {
        if let Some(branch_id) = self.active_branch_id.clone() {
            return self
                .branches
                .get_mut(&branch_id)
                .map(|branch| &mut branch.thread)
                .context(UnknownBranchSnafu { branch_id });
        }
        let id = self.current_thread_id.clone().context(NoActiveThreadSnafu)?;
        self.threads.get_mut(&id).context(UnknownThreadSnafu { thread_id: id })
    }

    /// Label identifying the active thread/branch in outbound
    /// notifications. A branch's `Thread` keeps its parent's `id` (it's a
    /// deep copy, §4.1), so the branch's own id is used here to keep
    /// branch traffic distinguishable from its parent's.
    fn active_label(&self) -> Result<String> {
        if let Some(branch_id) = &self.active_branch_id {
            if !self.branches.contains_key(branch_id) {
                return UnknownBranchSnafu { branch_id: branch_id.clone() }.fail();
            }
            return Ok(branch_id.clone());
        }
        let id = self.current_thread_id.clone().context(NoActiveThreadSnafu)?;
        if !self.threads.contains_key(&id) {
            return UnknownThreadSnafu { thread_id: id }.fail();
        }
        Ok(id)
    }

    fn emit(&self, thread_id: &str, event: ThreadEvent) {
        let _ = self.events.send(StoreNotification { thread_id: thread_id.to_string(), event });
    }

    pub fn create_thread(&mut self) -> String {
        let id = format!("thread_{}", Uuid::new_v4());
        self.threads.insert(id.clone(), Thread::new(id.clone()));
        self.current_thread_id = Some(id.clone());
        self.active_branch_id = None;
        id
    }

    pub fn switch_thread(&mut self, thread_id: &str) -> Result<()> {
        if !self.threads.contains_key(thread_id) {
            return UnknownThreadSnafu { thread_id: thread_id.to_string() }.fail();
        }
        self.current_thread_id = Some(thread_id.to_string());
        self.active_branch_id = None;
        Ok(())
    }

    /// Make `branch_id` the active message list for subsequent ops
    /// (§3 "Switching the active branch changes which message list the
    /// loop reads").
    pub fn switch_branch(&mut self, branch_id: &str) -> Result<()> {
        if !self.branches.contains_key(branch_id) {
            return UnknownBranchSnafu { branch_id: branch_id.to_string() }.fail();
        }
        self.active_branch_id = Some(branch_id.to_string());
        Ok(())
    }

    pub fn delete_thread(&mut self, thread_id: &str) -> Result<()> {
        if self.threads.remove(thread_id).is_none() {
            return UnknownThreadSnafu { thread_id: thread_id.to_string() }.fail();
        }
        self.branches.retain(|_, branch| branch.parent_thread_id != thread_id);
        if self.current_thread_id.as_deref() == Some(thread_id) {
            self.current_thread_id = self.threads.keys().next().cloned();
            self.active_branch_id = None;
        }
        Ok(())
    }

    /// Append a user message, first capturing a `user_message` checkpoint
    /// over every pinned context item and every file still under a
    /// pending (unapplied) change (§4.1).
    pub async fn add_user_message(&mut self, content: UserContent, context_items: Vec<String>) -> Result<String> {
        let mut paths = context_items.clone();
        for change in self.pending_changes.values() {
            if change.is_pending() && !paths.contains(&change.file_path) {
                paths.push(change.file_path.clone());
            }
        }
        let checkpoint = CheckpointManager::new(&self.workspace).capture(CheckpointKind::UserMessage, &paths).await;

        let id = format!("msg_{}", Uuid::new_v4());
        let message = Message::User { id: id.clone(), created_at: chrono::Utc::now(), content, context_items };

        let thread = self.active_thread_mut()?;
        thread.messages.push(checkpoint);
        thread.messages.push(message);
        thread.touch();
        Ok(id)
    }

    /// Start a new in-flight assistant message; the loop streams into it
    /// via [`Self::append_to_assistant`]/[`Self::append_reasoning_to_assistant`]
    /// and closes it with [`Self::finalize_assistant`].
    pub fn add_assistant_message(&mut self) -> Result<String> {
        let id = format!("msg_{}", Uuid::new_v4());
        let message = Message::Assistant {
            id: id.clone(),
            created_at: chrono::Utc::now(),
            content: String::new(),
            parts: Vec::new(),
            tool_calls: Vec::new(),
            compacted_at: None,
        };
        let thread = self.active_thread_mut()?;
        thread.messages.push(message);
        thread.stream_state.phase = StreamPhase::Streaming;
        thread.stream_state.active_message_id = Some(id.clone());
        thread.stream_state.text_finalized = false;
        thread.touch();
        Ok(id)
    }

    fn assistant_parts_mut<'a>(thread: &'a mut Thread, message_id: &str) -> Result<(&'a mut String, &'a mut Vec<AssistantPart>)> {
        let message = thread
            .find_message_mut(message_id)
            .context(MessageNotFoundSnafu { message_id: message_id.to_string() })?;
        match message {
            Message::Assistant { content, parts, .. } => Ok((content, parts)),
            _ => NotAssistantMessageSnafu { message_id: message_id.to_string() }.fail(),
        }
    }

    /// Append a text delta, merging into the in-flight text part unless
    /// it was closed by an interleaved tool-call or reasoning part
    /// (§4.2, §4.4).
    pub fn append_to_assistant(&mut self, message_id: &str, delta: &str) -> Result<()> {
        let label = self.active_label()?;
        let thread = self.active_thread_mut()?;
        let text_finalized = thread.stream_state.text_finalized;
        let (content, parts) = Self::assistant_parts_mut(thread, message_id)?;
        content.push_str(delta);
        match parts.last_mut() {
            Some(AssistantPart::Text { text }) if !text_finalized => text.push_str(delta),
            _ => parts.push(AssistantPart::Text { text: delta.to_string() }),
        }
        thread.stream_state.text_finalized = false;
        thread.touch();
        self.emit(&label, ThreadEvent::TextDelta { message_id: message_id.to_string(), delta: delta.to_string() });
        Ok(())
    }

    /// Append a reasoning delta. Reasoning always opens its own part, and
    /// closes whatever text part preceded it (§3 "parts" ordering).
    pub fn append_reasoning_to_assistant(&mut self, message_id: &str, delta: &str) -> Result<()> {
        let label = self.active_label()?;
        let thread = self.active_thread_mut()?;
        let (_content, parts) = Self::assistant_parts_mut(thread, message_id)?;
        match parts.last_mut() {
            Some(AssistantPart::Reasoning { text }) => text.push_str(delta),
            _ => parts.push(AssistantPart::Reasoning { text: delta.to_string() }),
        }
        thread.stream_state.text_finalized = true;
        thread.touch();
        self.emit(&label, ThreadEvent::ReasoningDelta { message_id: message_id.to_string(), delta: delta.to_string() });
        Ok(())
    }

    /// Close out an assistant message's streaming phase. Callers must
    /// flush any buffered delta events (§4.7) before calling this, so a
    /// subscriber never observes `message_finalized` race ahead of the
    /// text/tool-call parts that produced it.
    pub fn finalize_assistant(&mut self, message_id: &str) -> Result<()> {
        let label = self.active_label()?;
        let thread = self.active_thread_mut()?;
        if thread.find_message(message_id).is_none() {
            return MessageNotFoundSnafu { message_id: message_id.to_string() }.fail();
        }
        thread.stream_state.phase = StreamPhase::Idle;
        thread.stream_state.active_message_id = None;
        thread.touch();
        self.emit(&label, ThreadEvent::MessageFinalized { message_id: message_id.to_string() });
        Ok(())
    }

    /// Append a tool-call part to an in-flight assistant message. Callers
    /// must flush the streaming buffer first (§4.4), since this emits the
    /// ordering-sensitive `tool_call_started` event.
    pub fn add_tool_call_part(&mut self, message_id: &str, tool_call: ToolCallPart) -> Result<()> {
        let label = self.active_label()?;
        let thread = self.active_thread_mut()?;
        let message = thread
            .find_message_mut(message_id)
            .context(MessageNotFoundSnafu { message_id: message_id.to_string() })?;
        let (parts, tool_calls) = match message {
            Message::Assistant { parts, tool_calls, .. } => (parts, tool_calls),
            _ => return NotAssistantMessageSnafu { message_id: message_id.to_string() }.fail(),
        };
        let tool_call_id = tool_call.id.clone();
        let name = tool_call.name.clone();
        let part_index = parts.len();
        parts.push(AssistantPart::ToolCall { tool_call });
        tool_calls.push(part_index);

        thread.stream_state.text_finalized = true;
        thread.stream_state.phase = StreamPhase::ToolPending;
        thread.touch();
        self.emit(&label, ThreadEvent::ToolCallStarted { message_id: message_id.to_string(), tool_call_id, name });
        Ok(())
    }

    /// Patch an in-flight tool call's name/arguments, creating it if
    /// absent. `None` fields are left unchanged; re-applying the same
    /// patch twice is a no-op (§4.1).
    pub fn update_tool_call(&mut self, message_id: &str, tool_call_id: &str, patch: ToolCallPatch) -> Result<()> {
        let thread = self.active_thread_mut()?;
        let message = thread
            .find_message_mut(message_id)
            .context(MessageNotFoundSnafu { message_id: message_id.to_string() })?;
        let (parts, tool_calls) = match message {
            Message::Assistant { parts, tool_calls, .. } => (parts, tool_calls),
            _ => return NotAssistantMessageSnafu { message_id: message_id.to_string() }.fail(),
        };

        let existing = tool_calls.iter().copied().find(|&index| {
            matches!(parts.get(index), Some(AssistantPart::ToolCall { tool_call }) if tool_call.id == tool_call_id)
        });

        match existing {
            Some(index) => {
                if let Some(AssistantPart::ToolCall { tool_call }) = parts.get_mut(index) {
                    if let Some(name) = patch.name {
                        tool_call.name = name;
                    }
                    if let Some(arguments) = patch.arguments {
                        tool_call.arguments = arguments;
                    }
                }
            }
            None => {
                let part_index = parts.len();
                parts.push(AssistantPart::ToolCall {
                    tool_call: ToolCallPart {
                        id: tool_call_id.to_string(),
                        name: patch.name.unwrap_or_default(),
                        arguments: patch.arguments.unwrap_or(Value::Null),
                        params_summary: None,
                    },
                });
                tool_calls.push(part_index);
            }
        }
        thread.touch();
        Ok(())
    }

    /// Record a tool's result. For mutating tools this first files a
    /// `tool_edit` checkpoint over `pre_images`, so rollback can always
    /// undo a side-effecting call (§4.1, §4.6). `pre_images` must be
    /// captured by the caller *before* dispatching the tool call — by
    /// the time a result exists to record, the tool has already run and
    /// the workspace no longer holds the pre-image this checkpoint
    /// needs to protect.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_tool_result(
        &mut self,
        tool_call_id: &str,
        name: &str,
        content: String,
        result_type: ToolResultType,
        params: Option<Value>,
        is_mutating: bool,
        touched_paths: &[String],
        pre_images: &[FileSnapshot],
    ) -> Result<String> {
        let label = self.active_label()?;

        if is_mutating && result_type.is_terminal() && !touched_paths.is_empty() {
            let snapshots = pre_images.iter().map(|snap| (snap.path.clone(), snap.clone())).collect();
            let checkpoint = Message::Checkpoint {
                id: format!("chk_{}", Uuid::new_v4()),
                created_at: chrono::Utc::now(),
                kind: CheckpointKind::ToolEdit,
                snapshots,
            };
            self.active_thread_mut()?.messages.push(checkpoint);
        }

        let id = format!("msg_{}", Uuid::new_v4());
        let message = Message::Tool {
            id: id.clone(),
            created_at: chrono::Utc::now(),
            tool_call_id: tool_call_id.to_string(),
            name: name.to_string(),
            content: content.clone(),
            result_type,
            params,
            compacted_at: None,
        };

        let thread = self.active_thread_mut()?;
        thread.messages.push(message);
        thread.stream_state.phase = StreamPhase::Idle;
        thread.touch();
        self.emit(&label, ThreadEvent::ToolResult { tool_call_id: tool_call_id.to_string(), result_type, content });
        Ok(id)
    }

    /// Truncate the active thread to `message_id` inclusive, dropping
    /// everything after it. Clears compression state and any pending
    /// change whose originating tool call no longer has a message
    /// (§4.1).
    pub fn delete_messages_after(&mut self, message_id: &str) -> Result<()> {
        let thread = self.active_thread_mut()?;
        let index = thread
            .position_of(message_id)
            .context(MessageNotFoundSnafu { message_id: message_id.to_string() })?;
        thread.messages.truncate(index + 1);
        thread.compression_state = CompressionState::default();
        thread.touch();

        let remaining: HashSet<String> = thread
            .messages
            .iter()
            .filter_map(|message| match message {
                Message::Tool { tool_call_id, .. } => Some(tool_call_id.clone()),
                _ => None,
            })
            .collect();
        self.pending_changes.retain(|_, change| remaining.contains(&change.tool_call_id));
        Ok(())
    }

    /// Restore every file protected by a checkpoint at or after
    /// `target_message_id`, then truncate the thread to that point
    /// (§4.1, §4.6).
    pub async fn rollback_to(&mut self, target_message_id: &str) -> Result<usize> {
        let snapshot = self.active_thread()?.clone();
        let restored = CheckpointManager::new(&self.workspace)
            .rollback_to(&snapshot, target_message_id)
            .await
            .context(CheckpointSnafu)?;
        self.delete_messages_after(target_message_id)?;
        Ok(restored)
    }

    /// Fork the active thread at `forked_from_message_id` into an
    /// independent branch (§4.1, §4.6).
    pub fn create_branch(&mut self, forked_from_message_id: &str) -> Result<String> {
        let thread = self.active_thread()?;
        if thread.position_of(forked_from_message_id).is_none() {
            return MessageNotFoundSnafu { message_id: forked_from_message_id.to_string() }.fail();
        }
        let branch = CheckpointManager::new(&self.workspace).create_branch(thread, forked_from_message_id);
        let branch_id = branch.id.clone();
        self.branches.insert(branch_id.clone(), branch);
        Ok(branch_id)
    }

    pub fn register_pending_change(&mut self, change: PendingChange) {
        self.pending_changes.insert(change.id.clone(), change);
    }

    pub fn pending_changes(&self) -> impl Iterator<Item = &PendingChange> {
        self.pending_changes.values()
    }

    pub fn set_pending_change_status(&mut self, change_id: &str, status: ChangeStatus) -> Result<()> {
        let change = self
            .pending_changes
            .get_mut(change_id)
            .context(UnknownPendingChangeSnafu { change_id: change_id.to_string() })?;
        change.status = status;
        Ok(())
    }

    /// Snapshot every thread/branch/index into the §6 persisted shape.
    /// `message_checkpoints` and `compression_stats` are rebuilt from
    /// the threads themselves rather than tracked incrementally, so
    /// they can never drift from what the messages actually say.
    pub fn to_document(&self) -> crate::persistence::WorkspaceDocument {
        let mut doc = crate::persistence::WorkspaceDocument::new();
        doc.threads = self.threads.clone();
        doc.current_thread_id = self.current_thread_id.clone();
        doc.branches = self.branches.clone();
        doc.active_branch_id = self.active_branch_id.clone();
        doc.pending_changes = self.pending_changes.clone();
        for (id, thread) in &self.threads {
            doc.message_checkpoints.insert(id.clone(), crate::persistence::WorkspaceDocument::checkpoint_ids_for(thread));
            if let Some(stats) = &thread.compression_state.compression_stats {
                doc.compression_stats.insert(id.clone(), stats.clone());
            }
        }
        doc
    }

    /// Replace this store's state with a previously persisted document.
    /// The derived indices (`message_checkpoints`, `compression_stats`)
    /// are discarded — the thread's own messages already carry that
    /// information (§9 "the index rebuilt on load").
    pub fn load_document(&mut self, doc: crate::persistence::WorkspaceDocument) {
        self.threads = doc.threads;
        self.current_thread_id = doc.current_thread_id;
        self.branches = doc.branches;
        self.active_branch_id = doc.active_branch_id;
        self.pending_changes = doc.pending_changes;
    }

    /// Save the current state to `<workspace_root>/forge_state.json`.
    pub async fn persist(&self) -> Result<()> {
        let path = self.workspace.workspace_root().join(crate::persistence::STATE_FILE_NAME);
        self.to_document().save(&path).await
    }

    /// Load state from `<workspace_root>/forge_state.json`, if present.
    /// A missing file leaves the store at its current (typically empty)
    /// state rather than erroring — a fresh workspace has nothing to
    /// resume.
    pub async fn restore(&mut self) -> Result<()> {
        let path = self.workspace.workspace_root().join(crate::persistence::STATE_FILE_NAME);
        let doc = crate::persistence::WorkspaceDocument::load(&path).await?;
        self.load_document(doc);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store.test.rs"]
mod tests;
