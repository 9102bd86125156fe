use super::*;

#[test]
fn ratio_handles_zero_before() {
    let stats = CompressionStats {
        tokens_before: 0,
        tokens_after: 0,
        messages_before: 0,
        messages_after: 0,
    };
    assert_eq!(stats.ratio(), 1.0);
}

#[test]
fn ratio_reflects_reduction() {
    let stats = CompressionStats {
        tokens_before: 1000,
        tokens_after: 250,
        messages_before: 40,
        messages_after: 10,
    };
    assert!((stats.ratio() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn summary_serde_round_trip() {
    let summary = StructuredSummary {
        created_at: Utc::now(),
        completed_tasks: vec![CompletedTask {
            description: "added auth middleware".to_string(),
            files_touched: vec!["src/auth.rs".to_string()],
        }],
        key_decisions: vec!["use snafu for errors".to_string()],
        open_questions: vec![],
        files_in_progress: vec!["src/main.rs".to_string()],
        is_fallback: false,
    };
    let json = serde_json::to_string(&summary).unwrap();
    let back: StructuredSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back.completed_tasks.len(), 1);
    assert!(!back.is_fallback);
}
