use forge_protocol::LlmStreamEvent;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::*;

struct StaticProvider;

#[async_trait::async_trait]
impl ProviderClient for StaticProvider {
    async fn stream_chat(
        &self,
        _request: ChatRequest,
        _cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<LlmStreamEvent>, String> {
        let (tx, rx) = mpsc::channel(PROVIDER_CHANNEL_CAPACITY);
        tx.send(LlmStreamEvent::TextDelta { delta: "hi".to_string() }).await.unwrap();
        tx.send(LlmStreamEvent::Done).await.unwrap();
        Ok(rx)
    }
}

#[tokio::test]
async fn stream_chat_yields_events_in_order() {
    let request = ChatRequest {
        messages: Vec::new(),
        tools: Vec::new(),
        parameters: RequestParameters { model: "test-model".to_string(), temperature: None, max_output_tokens: None },
    };
    let mut rx = StaticProvider.stream_chat(request, CancellationToken::new()).await.unwrap();

    assert!(matches!(rx.recv().await, Some(LlmStreamEvent::TextDelta { delta }) if delta == "hi"));
    assert!(matches!(rx.recv().await, Some(LlmStreamEvent::Done)));
    assert!(rx.recv().await.is_none());
}
