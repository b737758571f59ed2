//! Shortest remaining time first (preemptive).

use crate::error::PolicyViolation;
use crate::lists::TaskList;
use crate::policy::{shortest_active, Dispatch};
use crate::task::Task;
use crate::types::TaskIdx;

/// Re-scans Ready every tick for the least remaining work in the active
/// burst, so a shorter arrival interrupts the running task.
#[derive(Debug, Clone, Copy, Default)]
pub struct Srtf;

impl Dispatch for Srtf {
    fn name(&self) -> &'static str {
        "srtf"
    }

    fn dispatch(
        &mut self,
        ready: &mut TaskList,
        tasks: &mut [Task],
    ) -> Result<TaskIdx, PolicyViolation> {
        shortest_active(ready, tasks).ok_or(PolicyViolation::EmptyReady { policy: self.name() })
    }
}
