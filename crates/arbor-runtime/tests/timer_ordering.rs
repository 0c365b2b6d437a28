//! Timer actions reach the task queue in creation order and cancelled
//! timers never run, whatever the delays and firing instants.

use arbor_core::TaskQueue;
use arbor_runtime::TimerManager;
use proptest::prelude::*;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Plan {
    delay_secs: u64,
    /// Cancel right after the firing pass at this checkpoint.
    cancel_after: Option<usize>,
}

fn plan() -> impl Strategy<Value = Plan> {
    (0u64..10, prop::option::of(0usize..6)).prop_map(|(delay_secs, cancel_after)| Plan {
        delay_secs,
        cancel_after,
    })
}

proptest! {
    #[test]
    fn due_timeouts_run_once_in_creation_order(
        plans in prop::collection::vec(plan(), 1..16),
        checkpoints in prop::collection::vec(0u64..12, 1..6),
    ) {
        let mut checkpoints = checkpoints;
        checkpoints.sort_unstable();
        let start = Instant::now();
        let mut timers = TimerManager::<Vec<usize>>::new();
        let queue = TaskQueue::new();
        let tasks: Vec<_> = plans
            .iter()
            .enumerate()
            .map(|(i, plan)| {
                timers.set_timeout(Duration::from_secs(plan.delay_secs), move |log: &mut Vec<usize>| {
                    log.push(i);
                })
            })
            .collect();

        // First checkpoint at which each timer is due.
        let due_at = |plan: &Plan| checkpoints.iter().position(|&secs| secs >= plan.delay_secs);

        let mut log = Vec::new();
        for (checkpoint, &secs) in checkpoints.iter().enumerate() {
            // Half a second of slack absorbs the time spent arming the timers.
            let now = start + Duration::from_secs(secs) + Duration::from_millis(500);
            timers.fire_due(now, &queue);
            for (plan, task) in plans.iter().zip(&tasks) {
                if plan.cancel_after == Some(checkpoint) {
                    task.cancel();
                }
            }

            log.clear();
            queue.run_pending(&mut log);
            let expected: Vec<usize> = plans
                .iter()
                .enumerate()
                .filter(|(_, plan)| due_at(*plan) == Some(checkpoint))
                .filter(|(_, plan)| plan.cancel_after.is_none_or(|at| at > checkpoint))
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(&log, &expected);
        }

        let last = checkpoints.len() - 1;
        let still_armed = plans
            .iter()
            .filter(|plan| due_at(*plan).is_none())
            .filter(|plan| plan.cancel_after.is_none_or(|at| at > last))
            .count();
        prop_assert_eq!(timers.len(), still_armed);
        prop_assert!(queue.is_empty());
    }
}
