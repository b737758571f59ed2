//! Scenario definition and builder API.

use std::collections::HashSet;

use crate::error::InputError;
use crate::task::TaskDef;
use crate::types::{Pid, Tick};

/// Safety bound on simulated ticks when nothing else is configured.
pub const DEFAULT_MAX_TICKS: Tick = 300;

/// A validated batch of tasks plus the tick bound for the run.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// In input order; the order breaks ties in admission and dispatch.
    pub tasks: Vec<TaskDef>,
    /// The run fails once the clock reaches this with work left.
    pub max_ticks: Tick,
}

/// Builder for constructing scenarios.
pub struct ScenarioBuilder {
    tasks: Vec<TaskDef>,
    max_ticks: Option<Tick>,
    next_pid: i64,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            tasks: Vec::new(),
            max_ticks: None,
            next_pid: 1,
        }
    }
}

impl ScenarioBuilder {
    /// Add a task with a full TaskDef.
    pub fn task(mut self, def: TaskDef) -> Self {
        self.tasks.push(def);
        self
    }

    /// Add several tasks, keeping their order.
    pub fn tasks(mut self, defs: impl IntoIterator<Item = TaskDef>) -> Self {
        self.tasks.extend(defs);
        self
    }

    /// Convenience: add a task with an auto-assigned integer PID.
    pub fn add_task(
        mut self,
        arrival_time: Tick,
        cpu_burst1: Tick,
        io_time: Tick,
        cpu_burst2: Tick,
    ) -> Self {
        let pid = self.next_pid;
        self.next_pid += 1;
        self.tasks.push(TaskDef::new(
            pid,
            arrival_time,
            cpu_burst1,
            io_time,
            cpu_burst2,
        ));
        self
    }

    /// Set the tick bound. Overrides `TICKSIM_MAX_TICKS`.
    pub fn max_ticks(mut self, ticks: Tick) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Build the scenario, rejecting duplicate process ids.
    ///
    /// Without an explicit bound, `TICKSIM_MAX_TICKS` is consulted, then
    /// [`DEFAULT_MAX_TICKS`].
    pub fn build(self) -> Result<Scenario, InputError> {
        let mut seen: HashSet<&Pid> = HashSet::with_capacity(self.tasks.len());
        for def in &self.tasks {
            if !seen.insert(&def.pid) {
                return Err(InputError::DuplicateProcess(def.pid.clone()));
            }
        }
        let max_ticks = match self.max_ticks {
            Some(t) => t,
            None => max_ticks_from_env()?,
        };
        Ok(Scenario {
            tasks: self.tasks,
            max_ticks,
        })
    }
}

/// Parse a tick bound from an optional string.
///
/// `None` or empty falls back to [`DEFAULT_MAX_TICKS`].
pub fn parse_max_ticks(s: Option<&str>) -> Result<Tick, InputError> {
    match s.map(str::trim) {
        None | Some("") => Ok(DEFAULT_MAX_TICKS),
        Some(s) => s.parse::<Tick>().map_err(|_| {
            InputError::InvalidValue(format!("max ticks {s:?}: expected a u64 integer"))
        }),
    }
}

/// Resolve the tick bound from `TICKSIM_MAX_TICKS`.
pub fn max_ticks_from_env() -> Result<Tick, InputError> {
    parse_max_ticks(std::env::var("TICKSIM_MAX_TICKS").ok().as_deref())
}
