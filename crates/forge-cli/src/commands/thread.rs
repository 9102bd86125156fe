//! `forge thread ...`: inspect and drive C1 (thread store) directly,
//! without a model in the loop.

use forge_protocol::AssistantPart;
use forge_protocol::Message;
use forge_protocol::UserContent;

use crate::engine::Engine;

pub async fn new(engine: &mut Engine) -> anyhow::Result<()> {
    let id = engine.store.create_thread();
    engine.persist().await?;
    println!("{id}");
    Ok(())
}

pub async fn list(engine: &Engine) -> anyhow::Result<()> {
    let current = engine.store.current_thread_id().map(str::to_string);
    for id in engine.store.thread_ids() {
        let marker = if Some(&id) == current.as_ref() { "*" } else { " " };
        println!("{marker} {id}");
    }
    Ok(())
}

pub async fn show(engine: &mut Engine, thread_id: &str, json: bool) -> anyhow::Result<()> {
    engine.store.switch_thread(thread_id)?;
    let thread = engine.store.thread()?;

    if json {
        println!("{}", serde_json::to_string_pretty(thread)?);
        return Ok(());
    }

    println!("thread {} ({} messages)", thread.id, thread.messages.len());
    for message in &thread.messages {
        print_message(message);
    }
    Ok(())
}

fn print_message(message: &Message) {
    match message {
        Message::User { id, content, .. } => {
            println!("[{id}] user: {}", truncate(&content.as_text()));
        }
        Message::Assistant { id, parts, compacted_at, .. } => {
            let summary: Vec<String> = parts
                .iter()
                .map(|part| match part {
                    AssistantPart::Text { text } => format!("text({})", truncate(text)),
                    AssistantPart::Reasoning { text } => format!("reasoning({})", truncate(text)),
                    AssistantPart::ToolCall { tool_call } => format!("tool_call({})", tool_call.name),
                })
                .collect();
            let compacted = if compacted_at.is_some() { " [compacted]" } else { "" };
            println!("[{id}] assistant: {}{compacted}", summary.join(", "));
        }
        Message::Tool { id, name, result_type, content, .. } => {
            println!("[{id}] tool({name}) {result_type:?}: {}", truncate(content));
        }
        Message::Checkpoint { id, kind, snapshots, .. } => {
            println!("[{id}] checkpoint({kind:?}): {} file(s)", snapshots.len());
        }
    }
}

fn truncate(text: &str) -> String {
    const MAX: usize = 80;
    if text.len() <= MAX {
        text.replace('\n', " ")
    } else {
        format!("{}…", text[..MAX].replace('\n', " "))
    }
}

pub async fn send(engine: &mut Engine, thread_id: &str, text: String) -> anyhow::Result<()> {
    engine.store.switch_thread(thread_id)?;
    let message_id = engine.store.add_user_message(UserContent::Text(text), Vec::new()).await?;
    engine.persist().await?;
    println!("{message_id}");
    Ok(())
}

#[cfg(test)]
#[path = "thread.test.rs"]
mod tests;
