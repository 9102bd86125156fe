//! Concurrency planner (§4.5 "Given a batch of tool calls from one
//! assistant turn"): groups a batch into sequential waves so
//! parallel-safe reads run together, target-exclusive writes on
//! disjoint paths run together, and sequential/same-target calls
//! serialize — while preserving call order for result recording
//! (§5 "Results must be recorded in call order, not completion order").

use std::collections::HashSet;

use forge_protocol::ConcurrencyClass;

/// One call as seen by the planner: its position in the original
/// batch, its declared concurrency class, and the path it targets (if
/// any — only meaningful for `target_exclusive`).
#[derive(Debug, Clone)]
pub struct PlannedCall {
    pub index: usize,
    pub concurrency: ConcurrencyClass,
    pub target_path: Option<String>,
}

/// Partition `calls` into waves. Each wave is a list of original
/// indices that may run concurrently; waves themselves run in order.
pub fn plan_waves(calls: &[PlannedCall]) -> Vec<Vec<usize>> {
    let mut waves = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut current_paths: HashSet<String> = HashSet::new();
    let mut current_has_sequential = false;

    for call in calls {
        let conflicts_with_current = !current.is_empty()
            && match call.concurrency {
                ConcurrencyClass::Sequential => true,
                ConcurrencyClass::TargetExclusive => {
                    current_has_sequential
                        || call.target_path.as_ref().is_some_and(|p| current_paths.contains(p))
                }
                ConcurrencyClass::ParallelSafe => current_has_sequential,
            };

        if conflicts_with_current {
            waves.push(std::mem::take(&mut current));
            current_paths.clear();
            current_has_sequential = false;
        }

        if matches!(call.concurrency, ConcurrencyClass::TargetExclusive) {
            if let Some(path) = &call.target_path {
                current_paths.insert(path.clone());
            }
        }
        if matches!(call.concurrency, ConcurrencyClass::Sequential) {
            current_has_sequential = true;
        }
        current.push(call.index);

        // A sequential call always runs alone; close its wave
        // immediately so nothing else joins it.
        if matches!(call.concurrency, ConcurrencyClass::Sequential) {
            waves.push(std::mem::take(&mut current));
            current_paths.clear();
            current_has_sequential = false;
        }
    }
    if !current.is_empty() {
        waves.push(current);
    }
    waves
}

#[cfg(test)]
#[path = "planner.test.rs"]
mod tests;
