use super::*;

#[test]
fn absent_snapshot_has_no_content() {
    let snap = FileSnapshot::new("src/new.rs", None);
    assert!(snap.is_absent());
}

#[test]
fn present_snapshot_round_trips_through_json() {
    let snap = FileSnapshot::new("src/main.rs", Some("fn main() {}".to_string()));
    let json = serde_json::to_string(&snap).unwrap();
    let back: FileSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snap.path, back.path);
    assert_eq!(snap.content, back.content);
}
