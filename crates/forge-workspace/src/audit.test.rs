use super::*;
use std::path::PathBuf;

#[test]
fn record_path_does_not_panic_on_either_outcome() {
    record_path(AuditOp::Read, &PathBuf::from("src/main.rs"), Ok(()));
    record_path(AuditOp::Write, &PathBuf::from(".env"), Err("sensitive path"));
}
