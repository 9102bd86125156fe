use super::*;
use crate::thread::Thread;

#[test]
fn branch_carries_an_independent_thread_copy() {
    let mut parent = Thread::new("parent");
    parent.context_items.push(crate::thread::ContextItem {
        id: "c1".to_string(),
        path: "src/main.rs".to_string(),
    });

    let branch = Branch::new("b1", "parent", "m5", parent.clone());
    assert_eq!(branch.thread.context_items.len(), 1);

    let mut branch = branch;
    branch.thread.context_items.clear();
    assert_eq!(parent.context_items.len(), 1);
    assert!(branch.thread.context_items.is_empty());
}
