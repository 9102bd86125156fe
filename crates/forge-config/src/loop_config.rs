//! Tunables for the agent loop's bounded-iteration and retry behavior
//! (§4.4, §4.5).

use serde::Deserialize;
use serde::Serialize;

/// Backoff strategy applied between retries of a retryable
/// provider/timeout error (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryBackoff {
    Fixed,
    Exponential,
}

impl Default for RetryBackoff {
    fn default() -> Self {
        RetryBackoff::Exponential
    }
}

/// Loop-detection thresholds (§4.4 "loop detection").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoopDetectionConfig {
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    #[serde(default = "default_max_exact_repeats")]
    pub max_exact_repeats: usize,
    #[serde(default = "default_max_same_target_repeats")]
    pub max_same_target_repeats: usize,
}

fn default_max_history() -> usize {
    50
}

fn default_max_exact_repeats() -> usize {
    5
}

fn default_max_same_target_repeats() -> usize {
    8
}

impl Default for LoopDetectionConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            max_exact_repeats: default_max_exact_repeats(),
            max_same_target_repeats: default_max_same_target_repeats(),
        }
    }
}

/// Agent-loop tunables (§4.4).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoopConfig {
    #[serde(default = "default_max_tool_loops")]
    pub max_tool_loops: u32,
    #[serde(default = "default_enable_auto_fix")]
    pub enable_auto_fix: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub retry_backoff: RetryBackoff,
    /// Multiplier applied to the delay between retries when
    /// `retry_backoff` is `Exponential` (§6 `retry_backoff: float`).
    #[serde(default = "default_retry_backoff_multiplier")]
    pub retry_backoff_multiplier: f32,
    #[serde(default = "default_tool_timeout_ms")]
    pub tool_timeout_ms: u64,
    #[serde(default)]
    pub loop_detection: LoopDetectionConfig,
}

fn default_max_tool_loops() -> u32 {
    20
}

fn default_enable_auto_fix() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_retry_backoff_multiplier() -> f32 {
    1.5
}

fn default_tool_timeout_ms() -> u64 {
    60_000
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_tool_loops: default_max_tool_loops(),
            enable_auto_fix: default_enable_auto_fix(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            retry_backoff: RetryBackoff::default(),
            retry_backoff_multiplier: default_retry_backoff_multiplier(),
            tool_timeout_ms: default_tool_timeout_ms(),
            loop_detection: LoopDetectionConfig::default(),
        }
    }
}

impl LoopConfig {
    /// Delay before the `attempt`-th retry (0-indexed), applying the
    /// configured backoff strategy (§7 "exponential backoff").
    pub fn retry_delay_for(&self, attempt: u32) -> std::time::Duration {
        let millis = match self.retry_backoff {
            RetryBackoff::Fixed => self.retry_delay_ms,
            RetryBackoff::Exponential => {
                let factor = self.retry_backoff_multiplier.powi(attempt as i32);
                (self.retry_delay_ms as f64 * factor as f64) as u64
            }
        };
        std::time::Duration::from_millis(millis)
    }
}

#[cfg(test)]
#[path = "loop_config.test.rs"]
mod tests;
