//! Round-Robin with a fixed quantum.

use tracing::trace;

use crate::error::PolicyViolation;
use crate::lists::TaskList;
use crate::policy::Dispatch;
use crate::task::Task;
use crate::types::{TaskIdx, Tick};

/// Runs the head of Ready for up to `quantum` consecutive ticks, then
/// rotates it to the tail.
///
/// The run counter belongs to the head task: when the head changes for any
/// other reason (the previous head finished its burst and left Ready) the
/// counter restarts.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    quantum: Tick,
    runs: Tick,
    prev_head: Option<TaskIdx>,
}

impl RoundRobin {
    pub fn new(quantum: Tick) -> Self {
        RoundRobin {
            quantum,
            runs: 0,
            prev_head: None,
        }
    }

    pub fn quantum(&self) -> Tick {
        self.quantum
    }
}

impl Dispatch for RoundRobin {
    fn name(&self) -> &'static str {
        "rr"
    }

    fn dispatch(
        &mut self,
        ready: &mut TaskList,
        tasks: &mut [Task],
    ) -> Result<TaskIdx, PolicyViolation> {
        let head = ready
            .head()
            .ok_or(PolicyViolation::EmptyReady { policy: self.name() })?;
        if self.prev_head != Some(head) {
            self.runs = 0;
        }

        if self.runs >= self.quantum {
            self.runs = 0;
            if ready.len() > 1 {
                trace!(pid = %tasks[head.0].pid, "rr: quantum expired, rotating");
                ready.rotate_head_to_tail();
            }
        }

        let head = ready
            .head()
            .ok_or(PolicyViolation::EmptyReady { policy: self.name() })?;
        self.runs += 1;
        self.prev_head = Some(head);
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_util::ready_set;

    #[test]
    fn test_rr_rotates_after_quantum() {
        let (mut tasks, mut ready) = ready_set(&[(9, 0, 0), (9, 0, 0), (9, 0, 0)]);
        let mut rr = RoundRobin::new(2);
        let picks: Vec<usize> = (0..7)
            .map(|_| rr.dispatch(&mut ready, &mut tasks).unwrap().0)
            .collect();
        assert_eq!(picks, vec![0, 0, 1, 1, 2, 2, 0]);
    }

    #[test]
    fn test_rr_single_task_keeps_running() {
        let (mut tasks, mut ready) = ready_set(&[(9, 0, 0)]);
        let mut rr = RoundRobin::new(1);
        for _ in 0..4 {
            assert_eq!(rr.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(0)));
        }
    }

    #[test]
    fn test_rr_counter_resets_when_head_changes() {
        let (mut tasks, mut ready) = ready_set(&[(9, 0, 0), (9, 0, 0), (9, 0, 0)]);
        let mut rr = RoundRobin::new(2);
        assert_eq!(rr.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(0)));

        // Head leaves Ready after one tick; the new head gets a full quantum.
        let mut ready: TaskList = [TaskIdx(1), TaskIdx(2)].into_iter().collect();
        assert_eq!(rr.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(1)));
        assert_eq!(rr.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(1)));
        assert_eq!(rr.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(2)));
    }
}
