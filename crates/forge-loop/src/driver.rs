//! The agent loop driver (§4.4): `idle -> preparing -> (compacting) ->
//! requesting -> streaming -> dispatching -> (awaiting_approval) ->
//! executing -> post_fix_check -> requesting | idle`.
//!
//! Modeled on the teacher's `AgentLoop`/`core_message_loop`: a single
//! procedural async driver rather than a literal enum-`match` state
//! machine, since the in-flight data a transition needs (the current
//! assistant message id, the accumulated tool-call batch) is awkward to
//! thread through a `match` without boxing it back up. [`phase`] is the
//! state machine's visible trace: every transition logs a
//! `tracing::debug!` tagged with the turn id and the `from`/`to` state
//! names (§4.4), even though control flow itself is ordinary `async fn`
//! calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use forge_config::EngineConfig;
use forge_context::Summarizer;
use forge_message::assemble;
use forge_message::expand_all;
use forge_message::ContextExpander;
use forge_message::SystemPromptParts;
use forge_message::WorkspaceMetadata;
use forge_protocol::ChangeStatus;
use forge_protocol::PendingChange;
use forge_protocol::PendingObjective;
use forge_protocol::ThreadEvent;
use forge_protocol::ToolCallPart;
use forge_protocol::ToolCallPatch;
use forge_protocol::ToolDescriptor;
use forge_protocol::ToolResultType;
use forge_protocol::Usage;
use forge_protocol::UserContent;
use forge_protocol::LlmStreamEvent;
use forge_stream::StreamBuffer;
use forge_thread_store::ThreadStore;
use forge_tools::parse_and_validate;
use forge_tools::CallOutcome;
use forge_tools::PreparedCall;
use forge_tools::ToolDispatcher;
use forge_tools::ToolError;
use forge_tools::ToolPreview;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;
use snafu::OptionExt;
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;
use uuid::Uuid;

use crate::error::CancelledSnafu;
use crate::error::NoPendingApprovalSnafu;
use crate::error::ProviderSnafu;
use crate::error::Result;
use crate::error::StoreSnafu;
use crate::error::StreamTimeoutSnafu;
use crate::error::ToolSnafu;
use crate::error::UnterminatedToolCallSnafu;
use crate::loop_detection::LoopDetector;
use crate::provider::ChatRequest;
use crate::provider::ProviderClient;

fn diff_stat(before: &str, after: &str) -> (u32, u32) {
    let diff = TextDiff::from_lines(before, after);
    let mut added = 0u32;
    let mut removed = 0u32;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, removed)
}

/// One call the turn paused on, surfaced to the host for an accept/
/// reject decision (§4.5 "surface as pending with a diff preview").
#[derive(Debug, Clone)]
pub struct PendingToolCall {
    pub tool_call_id: String,
    pub name: String,
    pub descriptor: ToolDescriptor,
    pub params: Value,
    pub preview: Option<ToolPreview>,
}

/// A batch of calls parked at `awaiting_approval`, for the host to
/// render and resolve via [`AgentLoop::resume_turn`].
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    pub assistant_message_id: String,
    pub calls: Vec<PendingToolCall>,
}

/// How the host resolved one paused call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalResolution {
    Approve,
    Reject,
}

/// What [`AgentLoop::run_turn`]/[`AgentLoop::resume_turn`] produced.
#[derive(Debug, Clone)]
pub enum TurnStep {
    /// The turn ran to completion (model stopped, budget exhausted,
    /// loop detected, cancelled, or handed off).
    Finished(crate::result::TurnOutcome),
    /// The turn halted at `awaiting_approval`; call `resume_turn` with
    /// the host's decisions to continue it.
    AwaitingApproval(ApprovalRequest),
}

struct PausedTurn {
    turn_id: String,
    tool_loops: u32,
    fix_used: bool,
    pending_calls: Vec<PendingToolCall>,
}

/// Drives request/tool-dispatch rounds for a single [`ThreadStore`]
/// thread against a fixed provider, registry and context pipeline.
/// Mirrors the teacher's `AgentLoop`: long-lived, one per active
/// thread, built once via [`AgentLoopBuilder`].
pub struct AgentLoop {
    store: ThreadStore,
    dispatcher: ToolDispatcher,
    provider: Arc<dyn ProviderClient>,
    summarizer: Arc<dyn Summarizer>,
    expander: Arc<dyn ContextExpander>,
    config: EngineConfig,
    model: String,
    static_prompt: String,
    role_prompt: String,
    paused: Option<PausedTurn>,
}

impl AgentLoop {
    pub fn builder() -> AgentLoopBuilder {
        AgentLoopBuilder::new()
    }

    /// The underlying thread store, for a host to inspect (rendering
    /// history) or persist between turns. The loop never persists on
    /// its own — that stays the host's call, same as which thread is
    /// active (§1: host-owned workspace/session lifecycle).
    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ThreadStore {
        &mut self.store
    }

    /// Start a fresh turn: append the user message, then drive request/
    /// tool rounds until the turn settles (§4.4 "idle -> preparing").
    pub async fn run_turn(
        &mut self,
        content: UserContent,
        context_items: Vec<String>,
        cancel: CancellationToken,
    ) -> Result<TurnStep> {
        self.store.add_user_message(content, context_items).await.context(StoreSnafu)?;
        self.drive(0, false, cancel).await
    }

    /// Resume a turn parked at `awaiting_approval` with the host's
    /// per-call decisions. Calls the decisions don't mention are
    /// treated as denied (§4.5 fail-safe default).
    pub async fn resume_turn(
        &mut self,
        decisions: HashMap<String, ApprovalResolution>,
        cancel: CancellationToken,
    ) -> Result<TurnStep> {
        let paused = self.paused.take().context(NoPendingApprovalSnafu)?;
        let PausedTurn { turn_id, tool_loops, mut fix_used, pending_calls } = paused;

        let prepared: Vec<PreparedCall> = pending_calls
            .iter()
            .map(|call| {
                let approved = matches!(decisions.get(&call.tool_call_id), Some(ApprovalResolution::Approve));
                PreparedCall {
                    id: call.tool_call_id.clone(),
                    name: call.name.clone(),
                    raw_arguments: call.params.to_string(),
                    explicitly_approved: approved,
                    explicitly_denied: !approved,
                }
            })
            .collect();

        let auto_approve = self.config.tools.auto_approve;
        let timeout_ms = self.config.loop_config.tool_timeout_ms;
        let outcomes =
            self.dispatcher.dispatch(&prepared, self.store.workspace(), &auto_approve, timeout_ms, &cancel).await;

        let mut touched_paths = Vec::new();
        for (call, outcome) in prepared.iter().zip(outcomes) {
            if let CallOutcome::Executed(exec) = &outcome {
                touched_paths.extend(exec.mutations.iter().map(|m| m.path.clone()));
            }
            // The first dispatch attempt already captured pre-images and
            // registered a `Pending` change for every one of these calls
            // (that's why they paused); resuming only ever flips status.
            self.record_outcome(call, outcome, &HashMap::new()).await?;
        }

        self.phase(&turn_id, "post_fix_check");
        self.maybe_post_fix(&mut fix_used, &touched_paths).await?;
        self.drive(tool_loops, fix_used, cancel).await
    }

    fn phase(&self, turn_id: &str, to: &'static str) {
        debug!(turn_id, state = to, "agent loop transition");
    }

    /// The core request/tool-dispatch cycle (§4.4). Runs until the turn
    /// settles at `idle` one way or another, or halts for approval.
    async fn drive(&mut self, mut tool_loops: u32, mut fix_used: bool, cancel: CancellationToken) -> Result<TurnStep> {
        let turn_id = format!("turn_{}", Uuid::new_v4());
        let mut compaction_stats = None;
        let mut detector = LoopDetector::new(&self.config.loop_config.loop_detection);

        loop {
            if cancel.is_cancelled() {
                return self.finish_cancelled(tool_loops, &turn_id).await;
            }

            self.phase(&turn_id, "preparing");
            if let Some(stats) = self.run_compaction(&turn_id).await? {
                compaction_stats = Some(stats);
            }
            if self.store.thread().context(StoreSnafu)?.compression_state.handoff_required {
                self.phase(&turn_id, "idle");
                let mut outcome = crate::result::TurnOutcome::handoff_required(tool_loops);
                if let Some(stats) = compaction_stats {
                    outcome = outcome.with_compaction(stats);
                }
                return Ok(TurnStep::Finished(outcome));
            }

            if tool_loops >= self.config.loop_config.max_tool_loops {
                self.phase(&turn_id, "interrupted");
                return self.finish_interrupted(tool_loops, compaction_stats, &turn_id).await;
            }
            tool_loops += 1;

            self.phase(&turn_id, "requesting");
            let assistant_id = self.store.add_assistant_message().context(StoreSnafu)?;

            self.phase(&turn_id, "streaming");
            let outcome = match self.stream_turn(&assistant_id, &cancel).await {
                Ok(outcome) => outcome,
                Err(crate::error::LoopError::Cancelled { .. }) => {
                    return self.finish_cancelled(tool_loops, &turn_id).await;
                }
                Err(err) => return Err(err),
            };

            if outcome.tool_calls.is_empty() {
                self.store.finalize_assistant(&assistant_id).context(StoreSnafu)?;
                self.phase(&turn_id, "idle");
                let mut result = crate::result::TurnOutcome::model_stopped(tool_loops, assistant_id);
                if let Some(stats) = compaction_stats {
                    result = result.with_compaction(stats);
                }
                return Ok(TurnStep::Finished(result));
            }

            self.phase(&turn_id, "dispatching");
            let (pre_images, loop_reason) = self.prescan(&outcome.tool_calls, &mut detector).await;
            if let Some(reason) = loop_reason {
                self.phase(&turn_id, "interrupted");
                return self.finish_loop_detected(tool_loops, compaction_stats, &turn_id, reason).await;
            }

            let auto_approve = self.config.tools.auto_approve;
            let timeout_ms = self.config.loop_config.tool_timeout_ms;
            let outcomes = self
                .dispatcher
                .dispatch(&outcome.tool_calls, self.store.workspace(), &auto_approve, timeout_ms, &cancel)
                .await;

            let mut pending = Vec::new();
            let mut touched_paths = Vec::new();
            for (call, result) in outcome.tool_calls.iter().zip(outcomes) {
                if let CallOutcome::Executed(exec) = &result {
                    touched_paths.extend(exec.mutations.iter().map(|m| m.path.clone()));
                }
                if let Some(pending_call) = self.record_outcome(call, result, &pre_images).await? {
                    pending.push(pending_call);
                }
            }

            if !pending.is_empty() {
                self.paused = Some(PausedTurn {
                    turn_id: turn_id.clone(),
                    tool_loops,
                    fix_used,
                    pending_calls: pending.clone(),
                });
                self.phase(&turn_id, "awaiting_approval");
                return Ok(TurnStep::AwaitingApproval(ApprovalRequest { assistant_message_id: assistant_id, calls: pending }));
            }

            self.phase(&turn_id, "post_fix_check");
            self.maybe_post_fix(&mut fix_used, &touched_paths).await?;
        }
    }

    /// Assemble the request, open the provider stream and coalesce
    /// deltas through a per-round [`StreamBuffer`], flushing before
    /// every ordering-sensitive store write (§4.4, §4.7).
    async fn stream_turn(&mut self, assistant_id: &str, cancel: &CancellationToken) -> Result<StreamOutcome> {
        let request = self.assemble_request().await?;

        let mut attempt = 0u32;
        let mut receiver = loop {
            match self.provider.stream_chat(request.clone(), cancel.child_token()).await {
                Ok(rx) => break rx,
                Err(message) if attempt < self.config.loop_config.max_retries => {
                    attempt += 1;
                    warn!(attempt, %message, "provider connection failed, retrying");
                    tokio::time::sleep(self.config.loop_config.retry_delay_for(attempt - 1)).await;
                }
                Err(message) => return ProviderSnafu { message, retryable: false }.fail(),
            }
        };

        let stall = Duration::from_millis(self.config.loop_config.tool_timeout_ms);
        let mut buffer = StreamBuffer::default();
        let mut open_fragments: Vec<String> = Vec::new();
        let mut calls: Vec<PreparedCall> = Vec::new();
        let mut usage = None;

        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    buffer.clear();
                    return CancelledSnafu.fail();
                }
                received = tokio::time::timeout(stall, receiver.recv()) => received,
            };

            let event = match received {
                Ok(Some(event)) => event,
                Ok(None) => return StreamTimeoutSnafu { millis: stall.as_millis() as u64 }.fail(),
                Err(_elapsed) => return StreamTimeoutSnafu { millis: stall.as_millis() as u64 }.fail(),
            };

            match event {
                LlmStreamEvent::TextDelta { delta } => {
                    buffer.push(ThreadEvent::TextDelta { message_id: assistant_id.to_string(), delta });
                }
                LlmStreamEvent::ReasoningDelta { delta } => {
                    buffer.push(ThreadEvent::ReasoningDelta { message_id: assistant_id.to_string(), delta });
                }
                LlmStreamEvent::ToolCallFragment { id, name, arguments_delta } => {
                    if !open_fragments.contains(&id) {
                        self.flush_buffer(assistant_id, &mut buffer)?;
                        self.store
                            .add_tool_call_part(
                                assistant_id,
                                ToolCallPart { id: id.clone(), name: name.unwrap_or_default(), arguments: Value::Null, params_summary: None },
                            )
                            .context(StoreSnafu)?;
                        open_fragments.push(id.clone());
                    }
                    buffer.push(ThreadEvent::ToolCallArgumentsDelta { tool_call_id: id, delta: arguments_delta });
                }
                LlmStreamEvent::ToolCallComplete { id, name, arguments } => {
                    self.flush_buffer(assistant_id, &mut buffer)?;
                    self.store
                        .update_tool_call(assistant_id, &id, ToolCallPatch { name: Some(name.clone()), arguments: Some(arguments.clone()) })
                        .context(StoreSnafu)?;
                    open_fragments.retain(|existing| existing != &id);
                    self.store
                        .emit_event(ThreadEvent::ToolCallCompleted { tool_call_id: id.clone(), arguments: arguments.clone() })
                        .context(StoreSnafu)?;
                    calls.push(PreparedCall {
                        id,
                        name,
                        raw_arguments: arguments.to_string(),
                        explicitly_approved: false,
                        explicitly_denied: false,
                    });
                }
                LlmStreamEvent::Usage { usage: reported } => usage = Some(reported),
                LlmStreamEvent::Done => break,
                LlmStreamEvent::Error { message, retryable } => {
                    buffer.clear();
                    return ProviderSnafu { message, retryable }.fail();
                }
            }

            if let Some(batch) = buffer.take_ready(Instant::now()) {
                self.apply_batch(&batch)?;
            }
        }

        if let Some(id) = open_fragments.into_iter().next() {
            return UnterminatedToolCallSnafu { id }.fail();
        }
        self.flush_buffer(assistant_id, &mut buffer)?;
        Ok(StreamOutcome { tool_calls: calls, usage })
    }

    fn apply_batch(&mut self, batch: &[ThreadEvent]) -> Result<()> {
        for event in batch {
            match event {
                ThreadEvent::TextDelta { message_id, delta } => {
                    self.store.append_to_assistant(message_id, delta).context(StoreSnafu)?;
                }
                ThreadEvent::ReasoningDelta { message_id, delta } => {
                    self.store.append_reasoning_to_assistant(message_id, delta).context(StoreSnafu)?;
                }
                ThreadEvent::ToolCallArgumentsDelta { .. } => {
                    self.store.emit_event(event.clone()).context(StoreSnafu)?;
                }
                _ => unreachable!("only delta events are ever pushed into the stream buffer"),
            }
        }
        Ok(())
    }

    fn flush_buffer(&mut self, _assistant_id: &str, buffer: &mut StreamBuffer) -> Result<()> {
        if let Some(batch) = buffer.take_pending() {
            self.apply_batch(&batch)?;
        }
        Ok(())
    }

    async fn assemble_request(&self) -> Result<ChatRequest> {
        let thread = self.store.thread().context(StoreSnafu)?.clone();
        let expanded = expand_all(&thread.context_items, self.expander.as_ref()).await;
        let handoff_block = thread.handoff_context.as_ref().map(render_handoff_block);
        let workspace_meta = WorkspaceMetadata {
            root_paths: vec![self.store.workspace().workspace_root().display().to_string()],
            git_status_summary: String::new(),
        };
        let system_parts = SystemPromptParts { static_prompt: &self.static_prompt, role_prompt: &self.role_prompt };
        let descriptors = self.dispatcher.registry().descriptors();
        let assembled = assemble(&thread, &expanded, &system_parts, &workspace_meta, handoff_block.as_deref(), &descriptors);
        Ok(ChatRequest {
            messages: assembled.messages,
            tools: assembled.tool_specifications,
            parameters: forge_protocol::RequestParameters {
                model: self.model.clone(),
                temperature: None,
                max_output_tokens: None,
            },
        })
    }

    async fn run_compaction(&mut self, turn_id: &str) -> Result<Option<forge_protocol::CompressionStats>> {
        let context_limit = self.config.context.max_context_tokens;
        let config = self.config.context.clone();
        let summarizer = self.summarizer.clone();
        let thread = self.store.thread_mut().context(StoreSnafu)?;
        let outcome = forge_context::run(thread, &config, context_limit, summarizer.as_ref()).await;
        if outcome.applied {
            self.phase(turn_id, "compacting");
            if let Some(stats) = outcome.stats.clone() {
                self.store.notify_compacted(stats).context(StoreSnafu)?;
            }
        }
        Ok(outcome.stats)
    }

    /// One pass over a dispatch batch: records loop-detector history and
    /// captures pre-dispatch snapshots for mutating calls, all before a
    /// single tool actually runs (§4.4 "maintain a bounded history").
    async fn prescan(&self, calls: &[PreparedCall], detector: &mut LoopDetector) -> (HashMap<String, forge_protocol::FileSnapshot>, Option<String>) {
        let mut snapshots = HashMap::new();
        let mut loop_reason = None;
        for call in calls {
            let Ok(tool) = self.dispatcher.registry().get(&call.name) else { continue };
            let Ok(params) = parse_and_validate(tool.descriptor(), &call.raw_arguments) else { continue };
            let target = tool.target_path(&params);

            if loop_reason.is_none() {
                loop_reason = detector.record(&call.name, &params, target.clone());
            }

            if tool.descriptor().mutation_kind == forge_protocol::MutationKind::Mutating {
                if let Some(path) = &target {
                    let content = self.store.workspace().read_text(path).await.ok();
                    snapshots.insert(call.id.clone(), forge_protocol::FileSnapshot::new(path.clone(), content));
                }
            }
        }
        (snapshots, loop_reason)
    }

    /// Record one call's outcome against the store and, for mutating
    /// calls, register or update its [`PendingChange`] (§4.5, §4.1).
    async fn record_outcome(
        &mut self,
        call: &PreparedCall,
        outcome: CallOutcome,
        pre_images: &HashMap<String, forge_protocol::FileSnapshot>,
    ) -> Result<Option<PendingToolCall>> {
        let change_id = format!("chg_{}", call.id);
        match outcome {
            CallOutcome::Executed(result) => {
                let snapshot = pre_images.get(&call.id).cloned();
                let touched: Vec<String> = result.mutations.iter().map(|m| m.path.clone()).collect();
                let pre_image_list: Vec<forge_protocol::FileSnapshot> = snapshot.clone().into_iter().collect();
                self.store
                    .add_tool_result(
                        &call.id,
                        &call.name,
                        result.content.clone(),
                        ToolResultType::Success,
                        None,
                        !result.mutations.is_empty(),
                        &touched,
                        &pre_image_list,
                    )
                    .await
                    .context(StoreSnafu)?;

                let already_pending = self.store.pending_changes().any(|change| change.id == change_id);
                if already_pending {
                    self.store.set_pending_change_status(&change_id, ChangeStatus::Applied).context(StoreSnafu)?;
                } else {
                    for mutation in &result.mutations {
                        let before = snapshot.as_ref().and_then(|s| s.content.as_deref()).unwrap_or("");
                        let after = mutation.new_content.as_deref().unwrap_or("");
                        let (added, removed) = diff_stat(before, after);
                        let change = PendingChange {
                            id: change_id.clone(),
                            file_path: mutation.path.clone(),
                            tool_call_id: call.id.clone(),
                            tool_name: call.name.clone(),
                            status: ChangeStatus::Applied,
                            snapshot: snapshot.clone().unwrap_or_else(|| forge_protocol::FileSnapshot::new(mutation.path.clone(), None)),
                            new_content: mutation.new_content.clone(),
                            change_type: mutation.change_type,
                            lines_added: added,
                            lines_removed: removed,
                        };
                        self.store.register_pending_change(change);
                    }
                }
                Ok(None)
            }
            CallOutcome::InvalidParams(message) => {
                self.store
                    .add_tool_result(&call.id, &call.name, message, ToolResultType::InvalidParams, None, false, &[], &[])
                    .await
                    .context(StoreSnafu)?;
                Ok(None)
            }
            CallOutcome::PendingApproval { descriptor, params } => {
                let preview = self
                    .dispatcher
                    .preview(&call.name, &call.raw_arguments, self.store.workspace(), &CancellationToken::new())
                    .await
                    .context(ToolSnafu)?;

                if let Some(preview) = &preview {
                    let tool = self.dispatcher.registry().get(&call.name).context(ToolSnafu)?;
                    let path = tool.target_path(&params).unwrap_or_default();
                    let snapshot = pre_images
                        .get(&call.id)
                        .cloned()
                        .unwrap_or_else(|| forge_protocol::FileSnapshot::new(path.clone(), None));
                    let change = PendingChange {
                        id: change_id.clone(),
                        file_path: path,
                        tool_call_id: call.id.clone(),
                        tool_name: call.name.clone(),
                        status: ChangeStatus::Pending,
                        snapshot,
                        new_content: preview.new_content.clone(),
                        change_type: preview.change_type,
                        lines_added: preview.lines_added,
                        lines_removed: preview.lines_removed,
                    };
                    self.store.register_pending_change(change);
                }

                self.store
                    .emit_event(ThreadEvent::ApprovalRequired { tool_call_id: call.id.clone(), name: call.name.clone() })
                    .context(StoreSnafu)?;
                Ok(Some(PendingToolCall { tool_call_id: call.id.clone(), name: call.name.clone(), descriptor, params, preview }))
            }
            CallOutcome::Failed(source) => {
                let rejected = matches!(source, ToolError::ApprovalDenied { .. });
                if rejected {
                    let _ = self.store.set_pending_change_status(&change_id, ChangeStatus::RolledBack);
                }
                let result_type = if rejected { ToolResultType::Rejected } else { ToolResultType::Error };
                self.store
                    .add_tool_result(&call.id, &call.name, source.to_string(), result_type, None, false, &[], &[])
                    .await
                    .context(StoreSnafu)?;
                Ok(None)
            }
        }
    }

    /// At most one auto-fix iteration per turn: surface LSP diagnostics
    /// for any file mutated this round as the next round's objective
    /// (§4.4 "post_fix_check").
    async fn maybe_post_fix(&mut self, fix_used: &mut bool, mutated_paths: &[String]) -> Result<()> {
        if *fix_used || !self.config.loop_config.enable_auto_fix || mutated_paths.is_empty() {
            return Ok(());
        }
        *fix_used = true;

        let mut diagnostics = Vec::new();
        for path in mutated_paths {
            let params = serde_json::json!({ "path": path });
            if let Ok(result) = self.store.workspace().lsp_query("diagnostics", params).await {
                if !result.is_null() {
                    diagnostics.push(format!("{path}: {result}"));
                }
            }
        }
        if diagnostics.is_empty() {
            return Ok(());
        }

        let thread = self.store.thread_mut().context(StoreSnafu)?;
        thread.pending_objective = Some(PendingObjective {
            objective: "Address diagnostics surfaced after the last file edit.".to_string(),
            steps: diagnostics,
        });
        Ok(())
    }

    async fn finish_cancelled(&mut self, tool_loops: u32, turn_id: &str) -> Result<TurnStep> {
        self.phase(turn_id, "cancelling");
        self.store.emit_event(ThreadEvent::Cancelled).context(StoreSnafu)?;
        self.phase(turn_id, "idle");
        Ok(TurnStep::Finished(crate::result::TurnOutcome::cancelled(tool_loops)))
    }

    async fn finish_interrupted(
        &mut self,
        tool_loops: u32,
        compaction: Option<forge_protocol::CompressionStats>,
        turn_id: &str,
    ) -> Result<TurnStep> {
        let assistant_id = self.store.add_assistant_message().context(StoreSnafu)?;
        self.store
            .append_to_assistant(&assistant_id, "[interrupted: exceeded the maximum number of tool-call rounds for this turn]")
            .context(StoreSnafu)?;
        self.store.finalize_assistant(&assistant_id).context(StoreSnafu)?;
        self.phase(turn_id, "idle");
        let mut outcome = crate::result::TurnOutcome::budget_exceeded(tool_loops);
        if let Some(stats) = compaction {
            outcome = outcome.with_compaction(stats);
        }
        Ok(TurnStep::Finished(outcome))
    }

    /// Same shape as [`Self::finish_interrupted`] but for a turn the
    /// loop detector aborted (§4.4 scenario: "an `interrupted`
    /// assistant message is appended; `stream_state.phase == idle`").
    async fn finish_loop_detected(
        &mut self,
        tool_loops: u32,
        compaction: Option<forge_protocol::CompressionStats>,
        turn_id: &str,
        reason: String,
    ) -> Result<TurnStep> {
        let assistant_id = self.store.add_assistant_message().context(StoreSnafu)?;
        self.store
            .append_to_assistant(&assistant_id, &format!("[interrupted: {reason}]"))
            .context(StoreSnafu)?;
        self.store.finalize_assistant(&assistant_id).context(StoreSnafu)?;
        self.phase(turn_id, "idle");
        let mut outcome = crate::result::TurnOutcome::loop_detected(tool_loops, reason);
        if let Some(stats) = compaction {
            outcome = outcome.with_compaction(stats);
        }
        Ok(TurnStep::Finished(outcome))
    }
}

/// One `stream_turn` pass: the calls the model made this round, if any,
/// and token usage if the provider reported it.
struct StreamOutcome {
    tool_calls: Vec<PreparedCall>,
    usage: Option<Usage>,
}

/// Render the handoff block the system prompt carries once a prior
/// turn reached L4 (§4.3, §4.2).
fn render_handoff_block(doc: &forge_protocol::HandoffDocument) -> String {
    let mut out = String::from("Context handoff from a prior session:\n");
    if let Some(objective) = &doc.pending_objective {
        out.push_str(&format!("Pending objective: {objective}\n"));
    }
    for step in &doc.pending_steps {
        out.push_str(&format!("- {step}\n"));
    }
    if !doc.summary.completed_tasks.is_empty() {
        out.push_str("Completed so far:\n");
        for task in &doc.summary.completed_tasks {
            out.push_str(&format!("- {}\n", task.description));
        }
    }
    if !doc.open_files.is_empty() {
        out.push_str(&format!("Open files: {}\n", doc.open_files.join(", ")));
    }
    out
}

/// Builds an [`AgentLoop`]. Mirrors the teacher's builder: required
/// seams panic in `build()` if never supplied, optional fields fall
/// back to sensible defaults.
pub struct AgentLoopBuilder {
    store: Option<ThreadStore>,
    dispatcher: Option<ToolDispatcher>,
    provider: Option<Arc<dyn ProviderClient>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    expander: Option<Arc<dyn ContextExpander>>,
    config: EngineConfig,
    model: String,
    static_prompt: String,
    role_prompt: String,
}

impl AgentLoopBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            dispatcher: None,
            provider: None,
            summarizer: None,
            expander: None,
            config: EngineConfig::with_workspace_root(std::path::PathBuf::new()),
            model: String::new(),
            static_prompt: String::new(),
            role_prompt: String::new(),
        }
    }

    pub fn store(mut self, store: ThreadStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn dispatcher(mut self, dispatcher: ToolDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn provider(mut self, provider: Arc<dyn ProviderClient>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn expander(mut self, expander: Arc<dyn ContextExpander>) -> Self {
        self.expander = Some(expander);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn system_prompt(mut self, static_prompt: impl Into<String>, role_prompt: impl Into<String>) -> Self {
        self.static_prompt = static_prompt.into();
        self.role_prompt = role_prompt.into();
        self
    }

    pub fn build(self) -> AgentLoop {
        AgentLoop {
            store: self.store.expect("store is required"),
            dispatcher: self.dispatcher.expect("dispatcher is required"),
            provider: self.provider.expect("provider is required"),
            summarizer: self.summarizer.expect("summarizer is required"),
            expander: self.expander.expect("expander is required"),
            config: self.config,
            model: self.model,
            static_prompt: self.static_prompt,
            role_prompt: self.role_prompt,
            paused: None,
        }
    }
}

impl Default for AgentLoopBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "driver.test.rs"]
mod tests;
