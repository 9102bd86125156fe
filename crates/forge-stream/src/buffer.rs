//! Single-threaded streaming event coalescer (C7, §4.4).
//!
//! Text/reasoning/tool-argument deltas arrive from the provider far
//! faster than a UI can usefully render, so they're merged into the
//! tail of the pending batch rather than forwarded one at a time.
//! Ordering-sensitive events (a tool call starting, a result landing, a
//! turn completing) force a synchronous flush first, so a consumer
//! never sees e.g. `tool_call_completed` arrive before the text that
//! preceded it. Grounded in the same coalesce-then-flush shape as the
//! teacher's filesystem-event throttler, adapted from a time-window
//! throttle to an explicit "ordering-sensitive event forces a flush"
//! rule since LLM stream events can't tolerate the fixed-window delay a
//! filesystem watcher can.

use std::time::Duration;
use std::time::Instant;

use forge_protocol::ThreadEvent;

/// Default flush cadence for coalesced delta events.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(16);

fn is_ordering_sensitive(event: &ThreadEvent) -> bool {
    !matches!(
        event,
        ThreadEvent::TextDelta { .. }
            | ThreadEvent::ReasoningDelta { .. }
            | ThreadEvent::ToolCallArgumentsDelta { .. }
    )
}

/// Coalesces a stream of [`ThreadEvent`]s for flush to a host/UI.
pub struct StreamBuffer {
    pending: Vec<ThreadEvent>,
    last_flush: Instant,
    interval: Duration,
}

impl StreamBuffer {
    pub fn new(interval: Duration) -> Self {
        Self {
            pending: Vec::new(),
            last_flush: Instant::now(),
            interval,
        }
    }

    /// Push one event. Delta events merge into the tail of the pending
    /// batch when possible; ordering-sensitive events are appended
    /// as-is and reported as immediately flushable via [`Self::is_due`].
    pub fn push(&mut self, event: ThreadEvent) {
        if !is_ordering_sensitive(&event) {
            if self.try_merge_into_tail(&event) {
                return;
            }
        }
        self.pending.push(event);
    }

    fn try_merge_into_tail(&mut self, event: &ThreadEvent) -> bool {
        let Some(tail) = self.pending.last_mut() else {
            return false;
        };
        match (tail, event) {
            (
                ThreadEvent::TextDelta { message_id: tail_id, delta: tail_delta },
                ThreadEvent::TextDelta { message_id, delta },
            ) if tail_id == message_id => {
                tail_delta.push_str(delta);
                true
            }
            (
                ThreadEvent::ReasoningDelta { message_id: tail_id, delta: tail_delta },
                ThreadEvent::ReasoningDelta { message_id, delta },
            ) if tail_id == message_id => {
                tail_delta.push_str(delta);
                true
            }
            (
                ThreadEvent::ToolCallArgumentsDelta { tool_call_id: tail_id, delta: tail_delta },
                ThreadEvent::ToolCallArgumentsDelta { tool_call_id, delta },
            ) if tail_id == tool_call_id => {
                tail_delta.push_str(delta);
                true
            }
            _ => false,
        }
    }

    /// True once the flush cadence has elapsed, or an ordering-sensitive
    /// event is waiting (those never wait out the cadence).
    pub fn is_due(&self, now: Instant) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.pending.iter().any(is_ordering_sensitive) || now.duration_since(self.last_flush) >= self.interval
    }

    /// Drain and return the pending batch if due, resetting the flush
    /// clock. Returns `None` if nothing is pending or the cadence
    /// hasn't elapsed and nothing ordering-sensitive is queued.
    pub fn take_ready(&mut self, now: Instant) -> Option<Vec<ThreadEvent>> {
        if !self.is_due(now) {
            return None;
        }
        self.last_flush = now;
        Some(std::mem::take(&mut self.pending))
    }

    /// Force a flush regardless of cadence, used before
    /// ordering-sensitive transitions that must observe a consistent
    /// batch boundary (e.g. right before dispatching a tool call).
    pub fn take_pending(&mut self) -> Option<Vec<ThreadEvent>> {
        if self.pending.is_empty() {
            return None;
        }
        self.last_flush = Instant::now();
        Some(std::mem::take(&mut self.pending))
    }

    /// Hard-cancel: drop everything buffered without flushing it. Used
    /// when a turn is cancelled and its partial output must not reach
    /// the host (§4.4 cancellation semantics).
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(dropped = self.pending.len(), "stream buffer cleared on cancel");
        }
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_FLUSH_INTERVAL)
    }
}

#[cfg(test)]
#[path = "buffer.test.rs"]
mod tests;
