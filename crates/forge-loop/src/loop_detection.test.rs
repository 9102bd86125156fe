use serde_json::json;

use super::*;

fn config() -> LoopDetectionConfig {
    LoopDetectionConfig { max_history: 50, max_exact_repeats: 5, max_same_target_repeats: 8 }
}

#[test]
fn identical_calls_trip_after_max_exact_repeats() {
    let mut detector = LoopDetector::new(&config());
    let params = json!({"query": "TODO"});

    for _ in 0..4 {
        assert!(detector.record("search_files", &params, None).is_none());
    }
    let reason = detector.record("search_files", &params, None);
    assert!(reason.is_some());
    assert!(reason.unwrap().contains("search_files"));
}

#[test]
fn key_order_does_not_evade_detection() {
    let mut detector = LoopDetector::new(&config());
    for i in 0..5 {
        let params = if i % 2 == 0 { json!({"a": 1, "b": 2}) } else { json!({"b": 2, "a": 1}) };
        detector.record("tool", &params, None);
    }
    let reason = detector.record("tool", &json!({"a": 1, "b": 2}), None);
    assert!(reason.is_some());
}

#[test]
fn distinct_params_never_trip_exact_repeat_detection() {
    let mut detector = LoopDetector::new(&config());
    for i in 0..20 {
        let reason = detector.record("read_file", &json!({"path": format!("file_{i}.rs")}), None);
        assert!(reason.is_none());
    }
}

#[test]
fn consecutive_mutations_on_same_target_trip_after_threshold() {
    let mut detector = LoopDetector::new(&config());
    for i in 0..7 {
        let params = json!({"path": "a.rs", "content": format!("v{i}")});
        assert!(detector.record("write_file", &params, Some("a.rs".to_string())).is_none());
    }
    let reason = detector.record("write_file", &json!({"path": "a.rs", "content": "v7"}), Some("a.rs".to_string()));
    assert!(reason.is_some());
    assert!(reason.unwrap().contains("a.rs"));
}

#[test]
fn interleaving_a_different_target_resets_the_consecutive_run() {
    let mut detector = LoopDetector::new(&config());
    for i in 0..7 {
        detector.record("write_file", &json!({"path": "a.rs", "v": i}), Some("a.rs".to_string()));
    }
    assert!(detector.record("write_file", &json!({"path": "b.rs"}), Some("b.rs".to_string())).is_none());
    for i in 0..7 {
        let reason = detector.record("write_file", &json!({"path": "a.rs", "v": 100 + i}), Some("a.rs".to_string()));
        assert!(reason.is_none(), "run should have reset after the interleaved b.rs call");
    }
}
