use super::*;

#[test]
fn empty_string_is_zero_tokens() {
    assert_eq!(estimate_tokens_str(""), 0);
}

#[test]
fn floors_to_nearest_four_chars() {
    assert_eq!(estimate_tokens_str("abcd"), 1);
    assert_eq!(estimate_tokens_str("abcdefg"), 1);
    assert_eq!(estimate_tokens_str("abcdefgh"), 2);
}

#[test]
fn value_is_estimated_via_serialization() {
    let value = serde_json::json!({"path": "a.ts"});
    assert_eq!(estimate_tokens_value(&value), estimate_tokens_str(&value.to_string()));
}

#[test]
fn overflow_predicate_matches_spec_formula() {
    // in > limit - max(out, 4096)
    assert!(is_overflow(100_000, 1_000, 100_000, 4_096));
    assert!(!is_overflow(90_000, 1_000, 100_000, 4_096));
    // output larger than the reserve widens the reserved window.
    assert!(is_overflow(96_001, 8_000, 100_000, 4_096));
    assert!(!is_overflow(91_000, 8_000, 100_000, 4_096));
}

#[test]
fn zero_context_limit_always_overflows() {
    assert!(is_overflow(0, 0, 0, 4_096));
}

#[test]
fn level_selection_follows_ratio_boundaries() {
    let limit = 100_000;
    assert_eq!(select_level(0, limit), CompressionLevel::L0);
    assert_eq!(select_level(49_999, limit), CompressionLevel::L0);
    assert_eq!(select_level(50_000, limit), CompressionLevel::L1);
    assert_eq!(select_level(69_999, limit), CompressionLevel::L1);
    assert_eq!(select_level(70_000, limit), CompressionLevel::L2);
    assert_eq!(select_level(84_999, limit), CompressionLevel::L2);
    assert_eq!(select_level(85_000, limit), CompressionLevel::L3);
    assert_eq!(select_level(94_999, limit), CompressionLevel::L3);
    assert_eq!(select_level(95_000, limit), CompressionLevel::L4);
    assert_eq!(select_level(200_000, limit), CompressionLevel::L4);
}

#[test]
fn zero_limit_selects_l4() {
    assert_eq!(select_level(0, 0), CompressionLevel::L4);
}

#[test]
fn levels_are_ordered() {
    assert!(CompressionLevel::L0 < CompressionLevel::L1);
    assert!(CompressionLevel::L3 < CompressionLevel::L4);
}
