use std::sync::Arc;

use async_trait::async_trait;
use forge_config::EngineConfig;
use forge_protocol::LlmStreamEvent;
use forge_protocol::UserContent;
use forge_thread_store::ThreadStore;
use forge_tools::register_builtins;
use forge_tools::ToolDispatcher;
use forge_tools::ToolRegistry;
use forge_workspace::WorkspaceGateway;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::*;

struct ScriptedProvider {
    rounds: std::sync::Mutex<Vec<Vec<LlmStreamEvent>>>,
}

impl ScriptedProvider {
    fn new(rounds: Vec<Vec<LlmStreamEvent>>) -> Self {
        Self { rounds: std::sync::Mutex::new(rounds) }
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn stream_chat(
        &self,
        _request: ChatRequest,
        _cancel: CancellationToken,
    ) -> std::result::Result<mpsc::Receiver<LlmStreamEvent>, String> {
        let mut rounds = self.rounds.lock().unwrap();
        if rounds.is_empty() {
            return Err("no more scripted rounds".to_string());
        }
        let events = rounds.remove(0);
        drop(rounds);
        let (tx, rx) = mpsc::channel(PROVIDER_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            for event in events {
                let _ = tx.send(event).await;
            }
        });
        Ok(rx)
    }
}

struct NullSummarizer;

#[async_trait]
impl forge_context::Summarizer for NullSummarizer {
    async fn summarize(&self, _span_text: &str) -> std::result::Result<forge_protocol::StructuredSummary, String> {
        Err("not needed for this test".to_string())
    }
}

struct NullExpander;

#[async_trait]
impl forge_message::ContextExpander for NullExpander {
    async fn expand(&self, _item: &forge_protocol::ContextItem) -> std::result::Result<String, String> {
        Ok(String::new())
    }
}

fn dispatcher() -> ToolDispatcher {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry);
    ToolDispatcher::new(registry)
}

fn build_loop(dir: &std::path::Path, provider: ScriptedProvider, config: EngineConfig) -> AgentLoop {
    let workspace = WorkspaceGateway::new(dir);
    let mut store = ThreadStore::new(workspace);
    store.create_thread();
    AgentLoop::builder()
        .store(store)
        .dispatcher(dispatcher())
        .provider(Arc::new(provider))
        .summarizer(Arc::new(NullSummarizer))
        .expander(Arc::new(NullExpander))
        .config(config)
        .model("test-model")
        .system_prompt("be helpful", "")
        .build()
}

#[tokio::test]
async fn a_turn_with_no_tool_calls_stops_on_model_output() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![vec![
        LlmStreamEvent::TextDelta { delta: "hello".to_string() },
        LlmStreamEvent::Done,
    ]]);
    let mut agent = build_loop(dir.path(), provider, EngineConfig::with_workspace_root(dir.path().to_path_buf()));

    let step = agent
        .run_turn(UserContent::Text("hi".to_string()), Vec::new(), CancellationToken::new())
        .await
        .unwrap();

    match step {
        TurnStep::Finished(outcome) => {
            assert_eq!(outcome.stop_reason, StopReason::ModelStopped);
            assert_eq!(outcome.tool_loops, 1);
        }
        other => panic!("expected Finished, got {other:?}"),
    }
}

#[tokio::test]
async fn a_read_only_tool_call_runs_without_pausing() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "file contents").await.unwrap();

    let provider = ScriptedProvider::new(vec![
        vec![
            LlmStreamEvent::ToolCallFragment { id: "call_1".to_string(), name: Some("read_file".to_string()), arguments_delta: "{\"path\"".to_string() },
            LlmStreamEvent::ToolCallComplete {
                id: "call_1".to_string(),
                name: "read_file".to_string(),
                arguments: serde_json::json!({"path": "a.txt"}),
            },
            LlmStreamEvent::Done,
        ],
        vec![LlmStreamEvent::TextDelta { delta: "done".to_string() }, LlmStreamEvent::Done],
    ]);
    let mut agent = build_loop(dir.path(), provider, EngineConfig::with_workspace_root(dir.path().to_path_buf()));

    let step = agent
        .run_turn(UserContent::Text("read a.txt".to_string()), Vec::new(), CancellationToken::new())
        .await
        .unwrap();

    match step {
        TurnStep::Finished(outcome) => assert_eq!(outcome.stop_reason, StopReason::ModelStopped),
        other => panic!("expected Finished after the tool round, got {other:?}"),
    }
}

#[tokio::test]
async fn a_write_without_auto_approve_pauses_and_resume_applies_it() {
    let dir = tempfile::tempdir().unwrap();

    let provider = ScriptedProvider::new(vec![
        vec![
            LlmStreamEvent::ToolCallComplete {
                id: "call_1".to_string(),
                name: "write_file".to_string(),
                arguments: serde_json::json!({"path": "out.txt", "content": "hello"}),
            },
            LlmStreamEvent::Done,
        ],
        vec![LlmStreamEvent::TextDelta { delta: "done".to_string() }, LlmStreamEvent::Done],
    ]);
    let mut agent = build_loop(dir.path(), provider, EngineConfig::with_workspace_root(dir.path().to_path_buf()));

    let step = agent
        .run_turn(UserContent::Text("write out.txt".to_string()), Vec::new(), CancellationToken::new())
        .await
        .unwrap();

    let request = match step {
        TurnStep::AwaitingApproval(request) => request,
        other => panic!("expected AwaitingApproval, got {other:?}"),
    };
    assert_eq!(request.calls.len(), 1);
    assert_eq!(request.calls[0].tool_call_id, "call_1");
    assert!(!dir.path().join("out.txt").exists());

    let mut decisions = HashMap::new();
    decisions.insert("call_1".to_string(), ApprovalResolution::Approve);
    let step = agent.resume_turn(decisions, CancellationToken::new()).await.unwrap();

    match step {
        TurnStep::Finished(outcome) => assert_eq!(outcome.stop_reason, StopReason::ModelStopped),
        other => panic!("expected Finished after resume, got {other:?}"),
    }
    assert_eq!(tokio::fs::read_to_string(dir.path().join("out.txt")).await.unwrap(), "hello");
}

#[tokio::test]
async fn resuming_with_no_decision_for_a_call_denies_it() {
    let dir = tempfile::tempdir().unwrap();

    let provider = ScriptedProvider::new(vec![vec![
        LlmStreamEvent::ToolCallComplete {
            id: "call_1".to_string(),
            name: "write_file".to_string(),
            arguments: serde_json::json!({"path": "out.txt", "content": "hello"}),
        },
        LlmStreamEvent::Done,
    ]]);
    let mut config = EngineConfig::with_workspace_root(dir.path().to_path_buf());
    config.loop_config.max_retries = 0;
    let mut agent = build_loop(dir.path(), provider, config);

    agent.run_turn(UserContent::Text("write out.txt".to_string()), Vec::new(), CancellationToken::new()).await.unwrap();

    let step = agent.resume_turn(HashMap::new(), CancellationToken::new()).await;
    assert!(step.is_err(), "denying the only pending call should not silently apply it, and driving a further round with no more scripted provider output should surface as a provider error");
    assert!(!dir.path().join("out.txt").exists());
}

#[tokio::test]
async fn exceeding_the_tool_loop_budget_interrupts_the_turn() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "x").await.unwrap();

    let round = || {
        vec![
            LlmStreamEvent::ToolCallComplete {
                id: format!("call_{}", uuid::Uuid::new_v4()),
                name: "read_file".to_string(),
                arguments: serde_json::json!({"path": "a.txt"}),
            },
            LlmStreamEvent::Done,
        ]
    };
    let mut config = EngineConfig::with_workspace_root(dir.path().to_path_buf());
    config.loop_config.max_tool_loops = 2;
    let provider = ScriptedProvider::new((0..2).map(|_| round()).collect());
    let mut agent = build_loop(dir.path(), provider, config);

    let step = agent
        .run_turn(UserContent::Text("loop".to_string()), Vec::new(), CancellationToken::new())
        .await
        .unwrap();

    match step {
        TurnStep::Finished(outcome) => assert_eq!(outcome.stop_reason, StopReason::BudgetExceeded),
        other => panic!("expected BudgetExceeded, got {other:?}"),
    }
}

#[tokio::test]
async fn repeating_the_same_call_trips_loop_detection() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "x").await.unwrap();

    let round = || {
        vec![
            LlmStreamEvent::ToolCallComplete {
                id: format!("call_{}", uuid::Uuid::new_v4()),
                name: "read_file".to_string(),
                arguments: serde_json::json!({"path": "a.txt"}),
            },
            LlmStreamEvent::Done,
        ]
    };
    let mut config = EngineConfig::with_workspace_root(dir.path().to_path_buf());
    config.loop_config.loop_detection.max_exact_repeats = 3;
    config.loop_config.max_tool_loops = 50;
    let provider = ScriptedProvider::new((0..3).map(|_| round()).collect());
    let mut agent = build_loop(dir.path(), provider, config);

    let step = agent
        .run_turn(UserContent::Text("loop".to_string()), Vec::new(), CancellationToken::new())
        .await
        .unwrap();

    match step {
        TurnStep::Finished(outcome) => assert!(matches!(outcome.stop_reason, StopReason::LoopDetected { .. })),
        other => panic!("expected LoopDetected, got {other:?}"),
    }
}

#[tokio::test]
async fn a_cancelled_token_ends_the_turn_as_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![vec![LlmStreamEvent::Done]]);
    let mut agent = build_loop(dir.path(), provider, EngineConfig::with_workspace_root(dir.path().to_path_buf()));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let step = agent.run_turn(UserContent::Text("hi".to_string()), Vec::new(), cancel).await.unwrap();

    match step {
        TurnStep::Finished(outcome) => assert_eq!(outcome.stop_reason, StopReason::Cancelled),
        other => panic!("expected Cancelled, got {other:?}"),
    }
}

#[tokio::test]
async fn resume_without_a_paused_turn_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![]);
    let mut agent = build_loop(dir.path(), provider, EngineConfig::with_workspace_root(dir.path().to_path_buf()));

    let result = agent.resume_turn(HashMap::new(), CancellationToken::new()).await;
    assert!(matches!(result, Err(LoopError::NoPendingApproval { .. })));
}
