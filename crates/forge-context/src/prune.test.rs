use super::*;
use forge_protocol::ToolResultType;
use forge_protocol::UserContent;

fn user(id: &str) -> Message {
    Message::User {
        id: id.to_string(),
        created_at: Utc::now(),
        content: UserContent::Text("hi".to_string()),
        context_items: vec![],
    }
}

fn tool(id: &str, name: &str, content: &str) -> Message {
    Message::Tool {
        id: id.to_string(),
        created_at: Utc::now(),
        tool_call_id: format!("call_{id}"),
        name: name.to_string(),
        content: content.to_string(),
        result_type: ToolResultType::Success,
        params: None,
        compacted_at: None,
    }
}

fn big_content(tokens: u32) -> String {
    "x".repeat((tokens * 4) as usize)
}

fn config(keep_recent_turns: usize, prune_minimum_tokens: u32, prune_protect_tokens: u32) -> ContextConfig {
    let mut config = ContextConfig::default();
    config.keep_recent_turns = keep_recent_turns;
    config.prune_minimum_tokens = prune_minimum_tokens;
    config.prune_protect_tokens = prune_protect_tokens;
    config
}

#[test]
fn prunes_old_tool_results_below_the_recent_turns_boundary() {
    let mut messages = vec![
        user("u1"),
        tool("t1", "read_file", &big_content(10_000)),
        user("u2"),
        tool("t2", "read_file", &big_content(10_000)),
    ];
    let config = config(1, 1_000, 0);
    let outcome = prune(&mut messages, &config);

    assert_eq!(outcome.pruned_message_ids, vec!["t1".to_string()]);
    let Message::Tool { compacted_at, .. } = &messages[1] else { panic!() };
    assert!(compacted_at.is_some());
    let Message::Tool { compacted_at, .. } = &messages[3] else { panic!() };
    assert!(compacted_at.is_none(), "message in the kept recent turn must stay untouched");
}

#[test]
fn protected_tools_are_never_pruned() {
    let mut messages = vec![
        user("u1"),
        tool("t1", "ask_user", &big_content(10_000)),
        user("u2"),
        tool("t2", "noop", &big_content(1)),
    ];
    let config = config(1, 1, 0);
    let outcome = prune(&mut messages, &config);
    assert!(outcome.is_empty());
}

#[test]
fn guard_skips_pruning_below_the_minimum_reclaimable() {
    let mut messages = vec![
        user("u1"),
        tool("t1", "read_file", &big_content(10)),
        user("u2"),
        tool("t2", "read_file", &big_content(10)),
    ];
    let config = config(1, 20_000, 0);
    let outcome = prune(&mut messages, &config);
    assert!(outcome.is_empty());
}

#[test]
fn protects_the_most_recent_tokens_of_tool_output_even_inside_prunable_range() {
    let mut messages = vec![
        user("u1"),
        tool("t1", "read_file", &big_content(5_000)),
        tool("t2", "read_file", &big_content(5_000)),
        user("u2"),
        tool("t3", "read_file", &big_content(1)),
    ];
    // keep_recent_turns=1 leaves [u1,t1,t2] prunable; protect 5_000
    // tokens from the tail of that range (t2), leaving only t1.
    let config = config(1, 1, 5_000);
    let outcome = prune(&mut messages, &config);
    assert_eq!(outcome.pruned_message_ids, vec!["t1".to_string()]);
}

#[test]
fn already_compacted_tool_results_are_skipped() {
    let mut messages = vec![user("u1"), tool("t1", "read_file", &big_content(10_000)), user("u2")];
    if let Message::Tool { compacted_at, .. } = &mut messages[1] {
        *compacted_at = Some(Utc::now());
    }
    let config = config(0, 1, 0);
    let outcome = prune(&mut messages, &config);
    assert!(outcome.is_empty());
}

#[test]
fn an_already_compacted_assistant_boundary_resets_candidates_before_it() {
    let mut messages = vec![
        user("u1"),
        tool("t1", "read_file", &big_content(10_000)),
        Message::Assistant {
            id: "a1".to_string(),
            created_at: Utc::now(),
            content: String::new(),
            parts: vec![],
            tool_calls: vec![],
            compacted_at: Some(Utc::now()),
        },
        tool("t2", "read_file", &big_content(10_000)),
        user("u2"),
    ];
    let config = config(0, 1, 0);
    let outcome = prune(&mut messages, &config);
    // t1 sits before the already-compacted boundary and is left alone;
    // t2 is newer than the boundary and is still a fresh candidate.
    assert_eq!(outcome.pruned_message_ids, vec!["t2".to_string()]);
}

#[test]
fn fewer_turns_than_the_keep_window_protects_everything() {
    let mut messages = vec![user("u1"), tool("t1", "read_file", &big_content(10_000))];
    let config = config(5, 1, 0);
    let outcome = prune(&mut messages, &config);
    assert!(outcome.is_empty());
}
