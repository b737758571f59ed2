//! Task model for the simulator.
//!
//! A task is a process with two CPU bursts separated by one I/O burst.
//! `TaskDef` is the immutable input record; `Task` is the runtime copy that
//! the engine mutates in place as simulated time advances.

use serde::{Deserialize, Serialize};

use crate::types::{Pid, Tick};

/// The list a task currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Not yet arrived.
    New,
    /// Eligible for dispatch.
    Ready,
    /// Blocked on its I/O burst.
    WaitingIo,
    /// All bursts consumed.
    Terminated,
}

/// Which CPU burst a task is currently consuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstPhase {
    First,
    Second,
}

/// Definition of a task for scenario creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDef {
    #[serde(rename = "processId")]
    pub pid: Pid,
    pub arrival_time: Tick,
    pub cpu_burst1: Tick,
    pub io_time: Tick,
    pub cpu_burst2: Tick,
}

impl TaskDef {
    pub fn new(
        pid: impl Into<Pid>,
        arrival_time: Tick,
        cpu_burst1: Tick,
        io_time: Tick,
        cpu_burst2: Tick,
    ) -> Self {
        TaskDef {
            pid: pid.into(),
            arrival_time,
            cpu_burst1,
            io_time,
            cpu_burst2,
        }
    }

    /// Total CPU demand of the task.
    pub fn cpu_demand(&self) -> Tick {
        self.cpu_burst1 + self.cpu_burst2
    }
}

/// A simulated task at runtime.
#[derive(Debug, Clone)]
pub struct Task {
    pub pid: Pid,
    pub arrival_time: Tick,
    /// Remaining units of the first CPU burst.
    pub cpu_burst1: Tick,
    /// Remaining units of the I/O burst.
    pub io_time: Tick,
    /// Remaining units of the second CPU burst.
    pub cpu_burst2: Tick,
    /// MLFQ feedback level. `None` until the feedback policy first sees the
    /// task.
    pub level: Option<u32>,
    pub state: TaskState,
}

impl Task {
    pub fn new(def: &TaskDef) -> Self {
        Task {
            pid: def.pid.clone(),
            arrival_time: def.arrival_time,
            cpu_burst1: def.cpu_burst1,
            io_time: def.io_time,
            cpu_burst2: def.cpu_burst2,
            level: None,
            state: TaskState::New,
        }
    }

    /// The burst currently being consumed: the first one while it has work
    /// left, the second one afterwards.
    pub fn active_phase(&self) -> BurstPhase {
        if self.cpu_burst1 > 0 {
            BurstPhase::First
        } else {
            BurstPhase::Second
        }
    }

    /// Remaining units of the active burst.
    pub fn active_remaining(&self) -> Tick {
        match self.active_phase() {
            BurstPhase::First => self.cpu_burst1,
            BurstPhase::Second => self.cpu_burst2,
        }
    }

    /// Consume one tick of CPU from the active burst. A finished burst stays
    /// at zero.
    pub fn run_tick(&mut self) {
        match self.active_phase() {
            BurstPhase::First => self.cpu_burst1 -= 1,
            BurstPhase::Second => self.cpu_burst2 = self.cpu_burst2.saturating_sub(1),
        }
    }

    /// Consume one tick of the I/O burst.
    pub fn io_tick(&mut self) {
        self.io_time = self.io_time.saturating_sub(1);
    }

    /// First burst done and I/O still pending.
    ///
    /// Must be checked before [`Task::is_terminated`]; the two are mutually
    /// exclusive on `io_time`.
    pub fn needs_io(&self) -> bool {
        self.cpu_burst1 == 0 && self.io_time != 0
    }

    pub fn is_terminated(&self) -> bool {
        self.cpu_burst1 == 0 && self.io_time == 0 && self.cpu_burst2 == 0
    }

    /// Feedback level, defaulting to the top level.
    pub fn level(&self) -> u32 {
        self.level.unwrap_or(1)
    }
}
