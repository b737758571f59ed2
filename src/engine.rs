//! Tick-driven simulation engine.
//!
//! This is the core of the simulator. It owns the task arena and the four
//! state lists, advances the simulated clock one tick at a time, asks the
//! dispatch policy which ready task runs, and records everything into a
//! [`Trace`].

use tracing::{debug, info, warn};

use crate::error::{PolicyViolation, SimError};
use crate::fmt;
use crate::lists::{TaskList, TaskLists};
use crate::policy::{Dispatch, Policy, PolicyConfig};
use crate::result::SimulationResult;
use crate::scenario::Scenario;
use crate::task::{Task, TaskState};
use crate::trace::{EventKind, ListSnapshot, Slot, Trace};
use crate::types::{Pid, TaskIdx, Tick};

/// The main simulator.
///
/// Holds only the policy selection; every run starts from a fresh policy
/// instance and a fresh copy of the tasks, so running the same scenario
/// twice gives identical results.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: PolicyConfig,
}

impl Simulator {
    pub fn new(config: PolicyConfig) -> Self {
        Simulator { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Run a scenario to completion and reduce it to a report.
    pub fn run(&self, scenario: &Scenario) -> Result<SimulationResult, SimError> {
        let trace = self.trace(scenario)?;
        Ok(SimulationResult::from_trace(&self.config, trace))
    }

    /// Run a scenario to completion and return the raw trace.
    pub fn trace(&self, scenario: &Scenario) -> Result<Trace, SimError> {
        let policy = Policy::new(&self.config)?;
        let mut state = RunState::new(scenario);
        let outcome = state.run(policy, scenario.max_ticks);
        fmt::clear_sim_clock();
        outcome.map(|()| state.trace)
    }
}

/// Mutable state of one run.
struct RunState {
    tasks: Vec<Task>,
    lists: TaskLists,
    clock: Tick,
    trace: Trace,
}

impl RunState {
    fn new(scenario: &Scenario) -> Self {
        let tasks: Vec<Task> = scenario.tasks.iter().map(Task::new).collect();
        let mut lists = TaskLists::new();
        lists.new = (0..tasks.len()).map(TaskIdx).collect();
        let trace = Trace::new(tasks.iter().map(|t| t.pid.clone()).collect());
        RunState {
            tasks,
            lists,
            clock: 0,
            trace,
        }
    }

    fn run(&mut self, mut policy: impl Dispatch, max_ticks: Tick) -> Result<(), SimError> {
        fmt::set_sim_clock(self.clock);
        info!(
            policy = policy.name(),
            tasks = self.tasks.len(),
            max_ticks,
            "START"
        );

        loop {
            fmt::set_sim_clock(self.clock);
            if self.lists.is_quiescent() {
                break;
            }
            if self.clock >= max_ticks {
                let unfinished = self.lists.unfinished();
                warn!(max_ticks, unfinished, "tick bound reached");
                return Err(SimError::RunawayLoop {
                    max_ticks,
                    unfinished,
                });
            }

            self.admit();
            self.record_snapshot();

            // Tasks admitted with nothing left to run leave without a tick.
            self.reclassify();
            if self.lists.is_quiescent() {
                break;
            }

            let running = if self.lists.ready.is_empty() {
                debug!("IDLE");
                self.trace.record(self.clock, EventKind::Idle, None);
                None
            } else {
                Some(self.dispatch(&mut policy)?)
            };

            self.advance(running);
            fmt::set_sim_clock(self.clock);
            self.reclassify();
        }

        info!(
            total_time = self.trace.total_time(),
            idle_time = self.trace.idle_time(),
            "DONE"
        );
        Ok(())
    }

    /// Move arrivals and I/O completions into Ready, in that order.
    fn admit(&mut self) {
        let clock = self.clock;
        let tasks = &self.tasks;
        let arrivals = self
            .lists
            .new
            .take_where(|idx| tasks[idx.0].arrival_time == clock);
        let returns = self
            .lists
            .waiting_io
            .take_where(|idx| tasks[idx.0].io_time == 0);

        for idx in arrivals {
            self.enter_ready(idx, EventKind::Arrival);
        }
        for idx in returns {
            self.enter_ready(idx, EventKind::IoReturn);
        }
    }

    fn enter_ready(&mut self, idx: TaskIdx, kind: EventKind) {
        let task = &mut self.tasks[idx.0];
        task.state = TaskState::Ready;
        info!(pid = %task.pid, event = ?kind, "READY");
        self.lists.ready.push_back(idx);
        self.trace.record(self.clock, kind, Some(&self.tasks[idx.0]));
    }

    fn record_snapshot(&mut self) {
        let pids = |list: &TaskList| -> Vec<Pid> {
            list.iter().map(|idx| self.tasks[idx.0].pid.clone()).collect()
        };
        let snapshot = ListSnapshot {
            time: self.clock,
            new: pids(&self.lists.new),
            ready: pids(&self.lists.ready),
            waiting_io: pids(&self.lists.waiting_io),
            terminated: pids(&self.lists.terminated),
        };
        self.trace.record_snapshot(snapshot);
    }

    /// Ask the policy for this tick's task and check it kept the contract.
    fn dispatch(&mut self, policy: &mut impl Dispatch) -> Result<TaskIdx, SimError> {
        let before = self.lists.ready.clone();
        let pick = policy.dispatch(&mut self.lists.ready, &mut self.tasks)?;

        if !self.lists.ready.same_members(&before) {
            return Err(PolicyViolation::MembershipChanged {
                policy: policy.name(),
            }
            .into());
        }
        if !self.lists.ready.contains(pick) {
            let pid = self
                .tasks
                .get(pick.0)
                .map_or_else(|| Pid::Num(pick.0 as i64), |t| t.pid.clone());
            return Err(PolicyViolation::NotInReady {
                policy: policy.name(),
                pid,
            }
            .into());
        }

        let task = &self.tasks[pick.0];
        debug!(
            pid = %task.pid,
            remaining = task.active_remaining(),
            level = task.level(),
            "RUN"
        );
        self.trace.record(self.clock, EventKind::Dispatch, Some(task));
        Ok(pick)
    }

    /// Advance the clock by one tick.
    fn advance(&mut self, running: Option<TaskIdx>) {
        let from = self.clock;
        self.clock += 1;

        let slot = match running {
            Some(idx) => {
                let task = &mut self.tasks[idx.0];
                task.run_tick();
                Slot::Task(task.pid.clone())
            }
            None => Slot::Idle,
        };
        self.trace.extend_timeline(slot, from);

        for idx in self.lists.waiting_io.iter() {
            self.tasks[idx.0].io_tick();
        }
        for idx in self.lists.ready.iter() {
            if Some(idx) != running {
                self.trace.record_waiting(idx);
            }
        }
    }

    /// Move Ready tasks that finished their active burst: to Waiting-I/O if
    /// I/O remains, else to Terminated if nothing remains. Outcomes are
    /// recorded in Ready order.
    fn reclassify(&mut self) {
        let tasks = &self.tasks;
        let leaving = self
            .lists
            .ready
            .take_where(|idx| tasks[idx.0].needs_io() || tasks[idx.0].is_terminated());

        for idx in leaving {
            let task = &mut self.tasks[idx.0];
            let kind = if task.needs_io() {
                task.state = TaskState::WaitingIo;
                info!(pid = %task.pid, io = task.io_time, "IO");
                self.lists.waiting_io.push_back(idx);
                EventKind::DepartToIo
            } else {
                task.state = TaskState::Terminated;
                info!(pid = %task.pid, "FINISHED");
                self.lists.terminated.push_back(idx);
                EventKind::Finished
            };
            self.trace.record(self.clock, kind, Some(&self.tasks[idx.0]));
        }
    }
}
