use super::*;

#[test]
fn model_stopped_carries_the_final_message_id() {
    let outcome = TurnOutcome::model_stopped(2, "msg_1".to_string());
    assert_eq!(outcome.stop_reason, StopReason::ModelStopped);
    assert_eq!(outcome.tool_loops, 2);
    assert_eq!(outcome.final_assistant_message_id.as_deref(), Some("msg_1"));
}

#[test]
fn budget_exceeded_has_no_final_message() {
    let outcome = TurnOutcome::budget_exceeded(20);
    assert_eq!(outcome.stop_reason, StopReason::BudgetExceeded);
    assert!(outcome.final_assistant_message_id.is_none());
}

#[test]
fn with_compaction_attaches_stats() {
    let stats = CompressionStats { tokens_before: 100, tokens_after: 40, messages_before: 10, messages_after: 4 };
    let outcome = TurnOutcome::model_stopped(1, "msg_1".to_string()).with_compaction(stats);
    assert!(outcome.compaction.is_some());
}
