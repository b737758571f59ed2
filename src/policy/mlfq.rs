//! Multi-level feedback queue.
//!
//! Every task carries a feedback level, starting at 1 (highest priority).
//! A task that runs for its level's full quantum without leaving Ready is
//! demoted one level and moved to the back of Ready. Each tick the task
//! with the numerically smallest level runs; ties go to list order.
//!
//! The quantum table is indexed by level. Slot 0 is a placeholder and never
//! read. Levels past the end of the table have no quantum, so a task that
//! reaches them runs until its burst ends.

use tracing::trace;

use crate::error::PolicyViolation;
use crate::lists::TaskList;
use crate::policy::Dispatch;
use crate::task::Task;
use crate::types::{TaskIdx, Tick};

#[derive(Debug, Clone)]
pub struct Mlfq {
    /// `level_quanta[level]`; slot 0 is unused.
    level_quanta: Vec<Tick>,
    runs: Tick,
    prev: Option<TaskIdx>,
}

impl Mlfq {
    pub fn new(level_quanta: Vec<Tick>) -> Self {
        Mlfq {
            level_quanta,
            runs: 0,
            prev: None,
        }
    }

    /// Quantum of a 1-based level, if the table covers it.
    pub fn quantum(&self, level: u32) -> Option<Tick> {
        if level == 0 {
            return None;
        }
        self.level_quanta.get(level as usize).copied()
    }
}

impl Dispatch for Mlfq {
    fn name(&self) -> &'static str {
        "mlfq"
    }

    fn dispatch(
        &mut self,
        ready: &mut TaskList,
        tasks: &mut [Task],
    ) -> Result<TaskIdx, PolicyViolation> {
        if ready.is_empty() {
            return Err(PolicyViolation::EmptyReady { policy: self.name() });
        }

        for idx in ready.iter() {
            let task = &mut tasks[idx.0];
            if task.level.is_none() {
                task.level = Some(1);
            }
        }

        match self.prev {
            Some(prev) if ready.contains(prev) => {
                let level = tasks[prev.0].level();
                if self.quantum(level).is_some_and(|q| self.runs >= q) {
                    tasks[prev.0].level = Some(level + 1);
                    ready.move_to_back(prev);
                    self.runs = 0;
                    trace!(pid = %tasks[prev.0].pid, level = level + 1, "mlfq: demoted");
                }
            }
            _ => self.runs = 0,
        }

        let mut pick: Option<(TaskIdx, u32)> = None;
        for idx in ready.iter() {
            let level = tasks[idx.0].level();
            match pick {
                Some((_, best)) if level >= best => {}
                _ => pick = Some((idx, level)),
            }
        }
        let (pick, _) = pick.ok_or(PolicyViolation::EmptyReady { policy: self.name() })?;

        if self.prev != Some(pick) {
            self.runs = 0;
        }
        self.runs += 1;
        self.prev = Some(pick);
        Ok(pick)
    }
}
