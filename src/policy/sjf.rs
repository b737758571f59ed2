//! Shortest job first (non-preemptive).

use tracing::trace;

use crate::error::PolicyViolation;
use crate::lists::TaskList;
use crate::policy::{shortest_active, Dispatch};
use crate::task::Task;
use crate::types::TaskIdx;

/// Picks the ready task with the shortest active burst and keeps running it
/// for as long as it stays in Ready, i.e. until its burst ends.
#[derive(Debug, Clone, Default)]
pub struct Sjf {
    current: Option<TaskIdx>,
}

impl Sjf {
    pub fn new() -> Self {
        Sjf { current: None }
    }
}

impl Dispatch for Sjf {
    fn name(&self) -> &'static str {
        "sjf"
    }

    fn dispatch(
        &mut self,
        ready: &mut TaskList,
        tasks: &mut [Task],
    ) -> Result<TaskIdx, PolicyViolation> {
        if let Some(current) = self.current {
            if ready.contains(current) {
                return Ok(current);
            }
        }

        let pick =
            shortest_active(ready, tasks).ok_or(PolicyViolation::EmptyReady { policy: self.name() })?;
        trace!(
            pid = %tasks[pick.0].pid,
            burst = tasks[pick.0].active_remaining(),
            "sjf: new job"
        );
        self.current = Some(pick);
        Ok(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_util::ready_set;

    #[test]
    fn test_sjf_sticks_with_running_job() {
        let (mut tasks, _) = ready_set(&[(5, 0, 0), (1, 0, 0)]);
        let mut sjf = Sjf::new();

        let mut ready: TaskList = [TaskIdx(0)].into_iter().collect();
        assert_eq!(sjf.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(0)));
        tasks[0].run_tick();

        // A shorter job showed up, but the running one keeps the CPU.
        let mut ready: TaskList = [TaskIdx(0), TaskIdx(1)].into_iter().collect();
        assert_eq!(sjf.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(0)));
    }

    #[test]
    fn test_sjf_recomputes_after_job_leaves() {
        let (mut tasks, _) = ready_set(&[(1, 0, 0), (4, 0, 0), (2, 0, 0)]);
        let mut sjf = Sjf::new();

        let mut ready: TaskList = [TaskIdx(0), TaskIdx(1), TaskIdx(2)].into_iter().collect();
        assert_eq!(sjf.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(0)));

        let mut ready: TaskList = [TaskIdx(1), TaskIdx(2)].into_iter().collect();
        assert_eq!(sjf.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(2)));
    }
}
