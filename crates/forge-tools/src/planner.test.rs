use super::*;

fn call(index: usize, concurrency: ConcurrencyClass, target_path: Option<&str>) -> PlannedCall {
    PlannedCall { index, concurrency, target_path: target_path.map(String::from) }
}

#[test]
fn three_parallel_reads_form_one_wave() {
    let calls = vec![
        call(0, ConcurrencyClass::ParallelSafe, Some("a.ts")),
        call(1, ConcurrencyClass::ParallelSafe, Some("b.ts")),
        call(2, ConcurrencyClass::ParallelSafe, Some("c.ts")),
    ];
    let waves = plan_waves(&calls);
    assert_eq!(waves, vec![vec![0, 1, 2]]);
}

#[test]
fn disjoint_target_exclusive_writes_share_a_wave() {
    let calls = vec![
        call(0, ConcurrencyClass::TargetExclusive, Some("a.ts")),
        call(1, ConcurrencyClass::TargetExclusive, Some("b.ts")),
    ];
    let waves = plan_waves(&calls);
    assert_eq!(waves, vec![vec![0, 1]]);
}

#[test]
fn same_target_writes_serialize() {
    let calls = vec![
        call(0, ConcurrencyClass::TargetExclusive, Some("a.ts")),
        call(1, ConcurrencyClass::TargetExclusive, Some("a.ts")),
    ];
    let waves = plan_waves(&calls);
    assert_eq!(waves, vec![vec![0], vec![1]]);
}

#[test]
fn sequential_call_always_runs_alone() {
    let calls = vec![
        call(0, ConcurrencyClass::ParallelSafe, Some("a.ts")),
        call(1, ConcurrencyClass::Sequential, None),
        call(2, ConcurrencyClass::ParallelSafe, Some("b.ts")),
    ];
    let waves = plan_waves(&calls);
    assert_eq!(waves, vec![vec![0], vec![1], vec![2]]);
}

#[test]
fn empty_batch_has_no_waves() {
    assert!(plan_waves(&[]).is_empty());
}

#[test]
fn call_order_preserved_within_a_wave() {
    let calls = vec![
        call(0, ConcurrencyClass::ParallelSafe, None),
        call(1, ConcurrencyClass::ParallelSafe, None),
    ];
    let waves = plan_waves(&calls);
    assert_eq!(waves[0], vec![0, 1]);
}
