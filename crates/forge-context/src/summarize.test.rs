use super::*;
use forge_protocol::ToolResultType;
use forge_protocol::UserContent;

fn user(id: &str, text: &str) -> Message {
    Message::User {
        id: id.to_string(),
        created_at: Utc::now(),
        content: UserContent::Text(text.to_string()),
        context_items: vec![],
    }
}

fn tool(id: &str) -> Message {
    Message::Tool {
        id: id.to_string(),
        created_at: Utc::now(),
        tool_call_id: format!("call_{id}"),
        name: "read_file".to_string(),
        content: "contents".to_string(),
        result_type: ToolResultType::Success,
        params: None,
        compacted_at: None,
    }
}

struct StubSummarizer {
    result: Result<StructuredSummary, String>,
}

#[async_trait::async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, _span_text: &str) -> Result<StructuredSummary, String> {
        self.result.clone()
    }
}

#[tokio::test]
async fn successful_summary_replaces_the_old_span_with_one_message() {
    let mut messages = vec![
        user("u1", "do the thing"),
        tool("t1"),
        user("u2", "keep going"),
        user("u3", "latest"),
    ];
    let mut config = ContextConfig::default();
    config.keep_recent_turns = 1;

    let stub = StubSummarizer {
        result: Ok(StructuredSummary {
            created_at: Utc::now(),
            completed_tasks: vec![CompletedTask { description: "did the thing".to_string(), files_touched: vec![] }],
            key_decisions: vec![],
            open_questions: vec![],
            files_in_progress: vec![],
            is_fallback: false,
        }),
    };

    let summary = summarize(&mut messages, &config, &stub).await;
    assert!(!summary.is_fallback);
    // The old span (u1, t1, u2) collapses into one synthesized message;
    // u3 (the retained recent turn) survives after it.
    assert_eq!(messages.len(), 2);
    let Message::Assistant { compacted_at, content, .. } = &messages[0] else { panic!("expected synthesized assistant message") };
    assert!(compacted_at.is_some());
    assert!(content.contains("did the thing"));
    assert!(matches!(&messages[1], Message::User { id, .. } if id == "u3"));
}

#[tokio::test]
async fn failed_summarizer_call_degrades_to_a_fallback_summary() {
    let mut messages = vec![user("u1", "do it"), user("u2", "latest")];
    let mut config = ContextConfig::default();
    config.keep_recent_turns = 1;

    let stub = StubSummarizer { result: Err("provider unavailable".to_string()) };
    let summary = summarize(&mut messages, &config, &stub).await;

    assert!(summary.is_fallback);
    let Message::Assistant { content, .. } = &messages[0] else { panic!() };
    assert!(content.contains("fallback"));
}

#[tokio::test]
async fn nothing_old_enough_to_summarize_is_a_noop() {
    let mut messages = vec![user("u1", "only turn")];
    let mut config = ContextConfig::default();
    config.keep_recent_turns = 5;

    let stub = StubSummarizer {
        result: Ok(StructuredSummary {
            created_at: Utc::now(),
            completed_tasks: vec![],
            key_decisions: vec![],
            open_questions: vec![],
            files_in_progress: vec![],
            is_fallback: false,
        }),
    };
    let summary = summarize(&mut messages, &config, &stub).await;
    assert!(!summary.is_fallback);
    assert_eq!(messages.len(), 1);
    assert!(matches!(&messages[0], Message::User { .. }));
}
