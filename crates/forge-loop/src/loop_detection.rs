//! Loop detection (§4.4): a bounded history of recent tool calls used
//! to abort a turn that is visibly stuck rather than burn the whole
//! tool-loop budget on repetition.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use forge_config::LoopDetectionConfig;
use serde_json::Value;
use sha2::Digest;
use sha2::Sha256;

#[derive(Debug, Clone)]
struct LoopEntry {
    tool_name: String,
    params_hash: String,
    target_path: Option<String>,
}

/// Tracks the last `max_history` dispatched calls and flags a turn as
/// looping once either threshold trips (§4.4 "loop detection").
pub struct LoopDetector {
    history: VecDeque<LoopEntry>,
    max_history: usize,
    max_exact_repeats: usize,
    max_same_target_repeats: usize,
}

impl LoopDetector {
    pub fn new(config: &LoopDetectionConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.max_history),
            max_history: config.max_history,
            max_exact_repeats: config.max_exact_repeats,
            max_same_target_repeats: config.max_same_target_repeats,
        }
    }

    /// Records one dispatched call. Returns `Some(reason)` once this
    /// call pushed a threshold over its limit; the caller ends the turn
    /// rather than continuing to dispatch.
    pub fn record(&mut self, tool_name: &str, params: &Value, target_path: Option<String>) -> Option<String> {
        let params_hash = hash_params(params);
        self.history.push_back(LoopEntry {
            tool_name: tool_name.to_string(),
            params_hash: params_hash.clone(),
            target_path: target_path.clone(),
        });
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }

        let exact_repeats =
            self.history.iter().filter(|e| e.tool_name == tool_name && e.params_hash == params_hash).count();
        if exact_repeats >= self.max_exact_repeats {
            return Some(format!("{tool_name} called with identical arguments {exact_repeats} times in a row"));
        }

        if let Some(path) = target_path {
            let consecutive =
                self.history.iter().rev().take_while(|e| e.target_path.as_deref() == Some(path.as_str())).count();
            if consecutive >= self.max_same_target_repeats {
                return Some(format!("{consecutive} consecutive mutating calls targeted {path:?}"));
            }
        }

        None
    }
}

/// SHA-256 over a sorted-keys JSON rendering of a tool call's
/// arguments, so semantically identical calls hash identically
/// regardless of key order.
fn hash_params(params: &Value) -> String {
    let canonical = canonicalize(params);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn canonicalize(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            let parts: Vec<String> = sorted.into_iter().map(|(k, v)| format!("{k:?}:{}", canonicalize(v))).collect();
            format!("{{{}}}", parts.join(","))
        }
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(canonicalize).collect();
            format!("[{}]", parts.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "loop_detection.test.rs"]
mod tests;
