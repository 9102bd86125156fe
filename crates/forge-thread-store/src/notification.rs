//! Outbound event envelope (§6): [`forge_protocol::ThreadEvent`] carries
//! no `thread_id` of its own, so the store tags every event with the
//! thread it belongs to before broadcasting it to subscribers.

use forge_protocol::ThreadEvent;

#[derive(Debug, Clone)]
pub struct StoreNotification {
    pub thread_id: String,
    pub event: ThreadEvent,
}
