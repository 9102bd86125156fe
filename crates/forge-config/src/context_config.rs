//! Tunables for the context manager's pruning/compression levels (§4.3).

use serde::Deserialize;
use serde::Serialize;

/// Context-window and pruning tunables (§4.2, §4.3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: usize,
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: u32,
    /// Number of most-recent turns L1 pruning always keeps intact.
    #[serde(default = "default_keep_recent_turns")]
    pub keep_recent_turns: usize,
    /// L1 only prunes a message if doing so frees at least this many
    /// tokens; below this, pruning isn't worth the fidelity loss.
    #[serde(default = "default_prune_minimum_tokens")]
    pub prune_minimum_tokens: u32,
    /// L1 never prunes a message within this many tokens of the head of
    /// the thread (keeps early system/setup context intact).
    #[serde(default = "default_prune_protect_tokens")]
    pub prune_protect_tokens: u32,
}

fn default_max_history_messages() -> usize {
    60
}

fn default_max_context_tokens() -> u32 {
    128_000
}

fn default_keep_recent_turns() -> usize {
    5
}

fn default_prune_minimum_tokens() -> u32 {
    20_000
}

fn default_prune_protect_tokens() -> u32 {
    40_000
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_history_messages: default_max_history_messages(),
            max_context_tokens: default_max_context_tokens(),
            keep_recent_turns: default_keep_recent_turns(),
            prune_minimum_tokens: default_prune_minimum_tokens(),
            prune_protect_tokens: default_prune_protect_tokens(),
        }
    }
}

#[cfg(test)]
#[path = "context_config.test.rs"]
mod tests;
