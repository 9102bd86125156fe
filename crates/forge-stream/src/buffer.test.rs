use super::*;

fn text_delta(message_id: &str, delta: &str) -> ThreadEvent {
    ThreadEvent::TextDelta {
        message_id: message_id.to_string(),
        delta: delta.to_string(),
    }
}

#[test]
fn merges_consecutive_text_deltas_for_the_same_message() {
    let mut buffer = StreamBuffer::new(Duration::from_millis(16));
    buffer.push(text_delta("m1", "Hel"));
    buffer.push(text_delta("m1", "lo"));

    let pending = buffer.take_pending().unwrap();
    assert_eq!(pending.len(), 1);
    match &pending[0] {
        ThreadEvent::TextDelta { delta, .. } => assert_eq!(delta, "Hello"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn does_not_merge_deltas_from_different_messages() {
    let mut buffer = StreamBuffer::new(Duration::from_millis(16));
    buffer.push(text_delta("m1", "a"));
    buffer.push(text_delta("m2", "b"));

    let pending = buffer.take_pending().unwrap();
    assert_eq!(pending.len(), 2);
}

#[test]
fn ordering_sensitive_event_is_immediately_due() {
    let mut buffer = StreamBuffer::new(Duration::from_secs(60));
    buffer.push(ThreadEvent::TurnComplete);
    assert!(buffer.is_due(Instant::now()));
}

#[test]
fn delta_only_batch_is_not_due_before_the_interval_elapses() {
    let mut buffer = StreamBuffer::new(Duration::from_secs(60));
    buffer.push(text_delta("m1", "a"));
    assert!(!buffer.is_due(Instant::now()));
    assert!(buffer.take_ready(Instant::now()).is_none());
}

#[test]
fn ordering_sensitive_event_does_not_merge_with_a_trailing_delta() {
    let mut buffer = StreamBuffer::new(Duration::from_millis(16));
    buffer.push(text_delta("m1", "partial"));
    buffer.push(ThreadEvent::ToolCallStarted {
        message_id: "m1".to_string(),
        tool_call_id: "tc1".to_string(),
        name: "read_file".to_string(),
    });

    let pending = buffer.take_pending().unwrap();
    assert_eq!(pending.len(), 2);
}

#[test]
fn clear_drops_buffered_events_without_returning_them() {
    let mut buffer = StreamBuffer::new(Duration::from_millis(16));
    buffer.push(text_delta("m1", "partial"));
    buffer.clear();
    assert!(buffer.is_empty());
    assert!(buffer.take_pending().is_none());
}

#[test]
fn take_ready_resets_the_flush_clock() {
    let mut buffer = StreamBuffer::new(Duration::from_millis(10));
    buffer.push(ThreadEvent::TurnComplete);
    let now = Instant::now();
    assert!(buffer.take_ready(now).is_some());
    buffer.push(text_delta("m1", "a"));
    assert!(!buffer.is_due(now));
}
