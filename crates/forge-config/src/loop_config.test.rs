use super::*;

#[test]
fn defaults_match_documented_values() {
    let config = LoopConfig::default();
    assert_eq!(config.max_tool_loops, 20);
    assert_eq!(config.loop_detection.max_history, 50);
    assert_eq!(config.loop_detection.max_exact_repeats, 5);
    assert_eq!(config.loop_detection.max_same_target_repeats, 8);
    assert!(config.enable_auto_fix);
    assert_eq!(config.retry_delay_ms, 1_000);
    assert_eq!(config.tool_timeout_ms, 60_000);
}

#[test]
fn exponential_backoff_scales_with_attempt() {
    let config = LoopConfig::default();
    assert_eq!(config.retry_delay_for(0), std::time::Duration::from_millis(1_000));
    assert_eq!(config.retry_delay_for(1), std::time::Duration::from_millis(1_500));
}

#[test]
fn fixed_backoff_never_scales() {
    let mut config = LoopConfig::default();
    config.retry_backoff = RetryBackoff::Fixed;
    assert_eq!(config.retry_delay_for(0), config.retry_delay_for(3));
}

#[test]
fn toml_fragment_overrides_only_named_fields() {
    let toml_str = "max_tool_loops = 5\n[loop_detection]\nmax_history = 10\n";
    let config: LoopConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.max_tool_loops, 5);
    assert_eq!(config.loop_detection.max_history, 10);
    assert_eq!(config.loop_detection.max_exact_repeats, 5);
    assert_eq!(config.retry_backoff, RetryBackoff::Exponential);
}
