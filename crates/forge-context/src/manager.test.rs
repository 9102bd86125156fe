use super::*;
use chrono::Utc;
use forge_protocol::Message;
use forge_protocol::StructuredSummary;
use forge_protocol::ToolResultType;
use forge_protocol::UserContent;

struct StubSummarizer;

#[async_trait::async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, _span_text: &str) -> std::result::Result<StructuredSummary, String> {
        Ok(StructuredSummary {
            created_at: Utc::now(),
            completed_tasks: vec![],
            key_decisions: vec![],
            open_questions: vec![],
            files_in_progress: vec![],
            is_fallback: false,
        })
    }
}

fn user(id: &str, text: &str) -> Message {
    Message::User {
        id: id.to_string(),
        created_at: Utc::now(),
        content: UserContent::Text(text.to_string()),
        context_items: vec![],
    }
}

fn big_tool(id: &str, tokens: u32) -> Message {
    Message::Tool {
        id: id.to_string(),
        created_at: Utc::now(),
        tool_call_id: format!("call_{id}"),
        name: "read_file".to_string(),
        content: "x".repeat((tokens * 4) as usize),
        result_type: ToolResultType::Success,
        params: None,
        compacted_at: None,
    }
}

#[tokio::test]
async fn low_utilization_thread_is_left_untouched() {
    let mut thread = Thread::new("t1");
    thread.messages.push(user("u1", "hello"));
    let mut config = ContextConfig::default();
    config.max_context_tokens = 1_000_000;

    let outcome = run(&mut thread, &config, 1_000_000, &StubSummarizer).await;
    assert_eq!(outcome.level, CompressionLevel::L0);
    assert!(!outcome.applied);
    assert!(thread.compression_state.achieved_level.is_none());
}

#[tokio::test]
async fn high_utilization_thread_is_pruned_and_marked_achieved() {
    let mut thread = Thread::new("t1");
    thread.messages.push(user("u1", "hello"));
    thread.messages.push(big_tool("t1", 10_000));
    thread.messages.push(user("u2", "more"));

    let mut config = ContextConfig::default();
    config.max_context_tokens = 12_000; // ratio ~0.83 -> L2
    config.keep_recent_turns = 1;
    config.prune_minimum_tokens = 100;

    let outcome = run(&mut thread, &config, 12_000, &StubSummarizer).await;
    assert_eq!(outcome.level, CompressionLevel::L2);
    assert!(outcome.applied);
    assert_eq!(thread.compression_state.achieved_level.as_deref(), Some("L2"));
    assert!(thread.compression_state.compression_stats.is_some());
}

#[tokio::test]
async fn rerunning_at_the_same_or_lower_level_is_a_noop() {
    let mut thread = Thread::new("t1");
    thread.messages.push(user("u1", "hello"));
    thread.messages.push(big_tool("t1", 10_000));
    thread.messages.push(user("u2", "more"));

    let mut config = ContextConfig::default();
    config.max_context_tokens = 12_000;
    config.keep_recent_turns = 1;
    config.prune_minimum_tokens = 100;

    let first = run(&mut thread, &config, 12_000, &StubSummarizer).await;
    assert!(first.applied);
    let messages_after_first = thread.messages.len();

    let second = run(&mut thread, &config, 12_000, &StubSummarizer).await;
    assert!(!second.applied);
    assert_eq!(thread.messages.len(), messages_after_first);
}

#[tokio::test]
async fn maximal_overflow_triggers_handoff() {
    let mut thread = Thread::new("t1");
    thread.messages.push(user("u1", "hello"));
    thread.messages.push(big_tool("t1", 20_000));

    let mut config = ContextConfig::default();
    config.max_context_tokens = 20_000; // ratio ~1.0 -> L4

    let outcome = run(&mut thread, &config, 20_000, &StubSummarizer).await;
    assert_eq!(outcome.level, CompressionLevel::L4);
    assert!(thread.compression_state.handoff_required);
    assert!(thread.compression_state.handoff_document.is_some());
}
