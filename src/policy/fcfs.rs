//! First-come, first-served.

use crate::error::PolicyViolation;
use crate::lists::TaskList;
use crate::policy::Dispatch;
use crate::task::Task;
use crate::types::TaskIdx;

/// Always runs the head of Ready. Simultaneous arrivals keep input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl Dispatch for Fcfs {
    fn name(&self) -> &'static str {
        "fcfs"
    }

    fn dispatch(
        &mut self,
        ready: &mut TaskList,
        _tasks: &mut [Task],
    ) -> Result<TaskIdx, PolicyViolation> {
        ready
            .head()
            .ok_or(PolicyViolation::EmptyReady { policy: self.name() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_util::ready_set;

    #[test]
    fn test_fcfs_ignores_burst_length() {
        let (mut tasks, mut ready) = ready_set(&[(9, 0, 0), (1, 0, 0)]);
        let mut fcfs = Fcfs;
        assert_eq!(fcfs.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(0)));
        assert_eq!(fcfs.dispatch(&mut ready, &mut tasks), Ok(TaskIdx(0)));
    }

    #[test]
    fn test_fcfs_empty_ready() {
        let (mut tasks, mut ready) = ready_set(&[]);
        assert_eq!(
            Fcfs.dispatch(&mut ready, &mut tasks),
            Err(PolicyViolation::EmptyReady { policy: "fcfs" })
        );
    }
}
