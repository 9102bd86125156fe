//! `forge`: a headless driver for the agent orchestration engine.
//!
//! Wires the thread store (C1), tool dispatcher (C5), checkpoint
//! manager (C6) and workspace gateway (C8) together for one workspace
//! and exposes them as inspection/debugging subcommands. There is no
//! `chat` subcommand here: driving a live turn needs an `AgentLoop`
//! (forge-loop) plus a concrete LLM provider adapter, and per-provider
//! adapters are an explicit out-of-scope collaborator for this engine
//! (see forge-loop's `ProviderClient` seam) — a host embeds forge-loop
//! directly rather than going through this binary for that.

mod commands;
mod engine;
mod tracing_init;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use engine::Engine;

#[derive(Parser)]
#[command(name = "forge", version, about = "Headless driver for the agent orchestration engine")]
struct Cli {
    /// Workspace root to operate on. Defaults to the current directory.
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Thread store (C1) operations.
    Thread {
        #[command(subcommand)]
        action: ThreadAction,
    },
    /// Tool registry and dispatcher (C5) operations.
    Tool {
        #[command(subcommand)]
        action: ToolAction,
    },
    /// Checkpoint/rollback (C6) operations.
    Checkpoint {
        #[command(subcommand)]
        action: CheckpointAction,
    },
    /// Pending file changes (§3, §4.5).
    Pending {
        #[command(subcommand)]
        action: PendingAction,
    },
    /// Print the resolved configuration for this workspace.
    Config,
}

#[derive(Subcommand)]
enum ThreadAction {
    /// Create a new, empty thread and make it current.
    New,
    /// List every thread in this workspace.
    List,
    /// Print one thread's messages.
    Show {
        thread_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Append a user message (and its preceding checkpoint) to a thread.
    Send { thread_id: String, text: String },
}

#[derive(Subcommand)]
enum ToolAction {
    /// List every registered tool and its approval/mutation/concurrency class.
    List,
    /// Dispatch a single tool call directly, bypassing the approval gate
    /// (invoking this command is itself the explicit approval).
    Run { name: String, arguments: String },
}

#[derive(Subcommand)]
enum CheckpointAction {
    /// Restore every file a checkpoint protects at or after `message_id`,
    /// then truncate the thread to that point.
    Rollback { thread_id: String, message_id: String },
}

#[derive(Subcommand)]
enum PendingAction {
    /// List tracked pending file changes across the workspace.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let workspace_root = engine::resolve_workspace_root(cli.workspace)?;
    let _tracing_guard = tracing_init::init(&workspace_root);
    let mut engine = Engine::open(&workspace_root).await?;

    match cli.command {
        Command::Thread { action } => match action {
            ThreadAction::New => commands::thread::new(&mut engine).await?,
            ThreadAction::List => commands::thread::list(&engine).await?,
            ThreadAction::Show { thread_id, json } => commands::thread::show(&mut engine, &thread_id, json).await?,
            ThreadAction::Send { thread_id, text } => commands::thread::send(&mut engine, &thread_id, text).await?,
        },
        Command::Tool { action } => match action {
            ToolAction::List => commands::tool::list(&engine)?,
            ToolAction::Run { name, arguments } => commands::tool::run(&mut engine, &name, arguments).await?,
        },
        Command::Checkpoint { action } => match action {
            CheckpointAction::Rollback { thread_id, message_id } => {
                commands::checkpoint::rollback(&mut engine, &thread_id, &message_id).await?
            }
        },
        Command::Pending { action } => match action {
            PendingAction::List => commands::pending::list(&engine)?,
        },
        Command::Config => commands::config::show(&engine)?,
    }

    Ok(())
}
