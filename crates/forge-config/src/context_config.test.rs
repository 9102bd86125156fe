use super::*;

#[test]
fn defaults_are_sane() {
    let config = ContextConfig::default();
    assert!(config.prune_minimum_tokens < config.prune_protect_tokens);
    assert!(config.keep_recent_turns >= 1);
}
