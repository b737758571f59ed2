//! Trace recording for the simulator.
//!
//! Every state transition (arrival, I/O return, dispatch, departure to I/O,
//! completion, idle tick) is appended to an event log with its simulated
//! tick. Alongside the log the trace keeps the run-length encoded timeline
//! of who held the CPU, per-task waiting-tick counters and, for playback,
//! a snapshot of the four lists at every tick.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::task::{Task, TaskState};
use crate::types::{Pid, TaskIdx, Tick};

/// Who held the CPU during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// No task was ready.
    Idle,
    Task(Pid),
}

impl Slot {
    pub fn pid(&self) -> Option<&Pid> {
        match self {
            Slot::Idle => None,
            Slot::Task(pid) => Some(pid),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Slot::Idle)
    }
}

/// The idle slot serializes as the string `"idle"`, tasks as their pid.
impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Slot::Idle => serializer.serialize_str("idle"),
            Slot::Task(pid) => pid.serialize(serializer),
        }
    }
}

/// A maximal run of consecutive ticks held by one slot, covering
/// `[from, to)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineInterval {
    pub slot: Slot,
    pub from: Tick,
    pub to: Tick,
}

impl TimelineInterval {
    pub fn len(&self) -> Tick {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.to == self.from
    }
}

impl Serialize for TimelineInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TimelineInterval", 3)?;
        s.serialize_field("processId", &self.slot)?;
        s.serialize_field("from", &self.from)?;
        s.serialize_field("to", &self.to)?;
        s.end()
    }
}

/// Kind of a logged state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// New to Ready.
    Arrival,
    /// Waiting-I/O to Ready.
    IoReturn,
    /// Picked to run this tick.
    Dispatch,
    /// Ready to Waiting-I/O after the first burst.
    DepartToIo,
    /// Ready to Terminated.
    Finished,
    /// Nothing was ready this tick.
    Idle,
}

/// Task counters at the moment an event was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    #[serde(rename = "processId")]
    pub pid: Pid,
    pub arrival_time: Tick,
    pub cpu_burst1: Tick,
    pub io_time: Tick,
    pub cpu_burst2: Tick,
    #[serde(rename = "priorityQueue", skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    pub state: TaskState,
}

impl From<&Task> for TaskSnapshot {
    fn from(task: &Task) -> Self {
        TaskSnapshot {
            pid: task.pid.clone(),
            arrival_time: task.arrival_time,
            cpu_burst1: task.cpu_burst1,
            io_time: task.io_time,
            cpu_burst2: task.cpu_burst2,
            level: task.level,
            state: task.state,
        }
    }
}

/// A single logged event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    #[serde(rename = "name")]
    pub kind: EventKind,
    pub task: Option<TaskSnapshot>,
    pub time: Tick,
}

impl TraceEvent {
    pub fn pid(&self) -> Option<&Pid> {
        self.task.as_ref().map(|t| &t.pid)
    }
}

/// Process ids in each list right after admission at `time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    pub time: Tick,
    pub new: Vec<Pid>,
    pub ready: Vec<Pid>,
    pub waiting_io: Vec<Pid>,
    pub terminated: Vec<Pid>,
}

/// A complete simulation trace.
#[derive(Debug, Clone)]
pub struct Trace {
    events: Vec<TraceEvent>,
    timeline: Vec<TimelineInterval>,
    snapshots: Vec<ListSnapshot>,
    /// Arena index to pid.
    pids: Vec<Pid>,
    /// Ready-but-not-dispatched ticks, by arena index.
    waiting: Vec<Tick>,
}

impl Trace {
    pub(crate) fn new(pids: Vec<Pid>) -> Self {
        let waiting = vec![0; pids.len()];
        Self {
            events: Vec::new(),
            timeline: Vec::new(),
            snapshots: Vec::new(),
            pids,
            waiting,
        }
    }

    pub(crate) fn record(&mut self, time: Tick, kind: EventKind, task: Option<&Task>) {
        self.events.push(TraceEvent {
            kind,
            task: task.map(TaskSnapshot::from),
            time,
        });
    }

    /// Account the tick `[from, from + 1)` to `slot`, extending the last
    /// interval when the same slot held the previous tick.
    pub(crate) fn extend_timeline(&mut self, slot: Slot, from: Tick) {
        if let Some(last) = self.timeline.last_mut() {
            if last.slot == slot && last.to == from {
                last.to += 1;
                return;
            }
        }
        self.timeline.push(TimelineInterval {
            slot,
            from,
            to: from + 1,
        });
    }

    pub(crate) fn record_waiting(&mut self, idx: TaskIdx) {
        self.waiting[idx.0] += 1;
    }

    pub(crate) fn record_snapshot(&mut self, snapshot: ListSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// All events in chronological order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// The coalesced timeline.
    pub fn timeline(&self) -> &[TimelineInterval] {
        &self.timeline
    }

    /// Per-tick list snapshots.
    pub fn snapshots(&self) -> &[ListSnapshot] {
        &self.snapshots
    }

    /// Process ids in input order.
    pub fn pids(&self) -> &[Pid] {
        &self.pids
    }

    /// Ready-but-not-dispatched ticks of a task.
    pub fn waiting_ticks(&self, pid: &Pid) -> Tick {
        self.pids
            .iter()
            .position(|p| p == pid)
            .map_or(0, |i| self.waiting[i])
    }

    /// Simulated time covered by the timeline.
    pub fn total_time(&self) -> Tick {
        self.timeline.last().map_or(0, |i| i.to)
    }

    /// Ticks on which nothing ran.
    pub fn idle_time(&self) -> Tick {
        self.timeline
            .iter()
            .filter(|i| i.slot.is_idle())
            .map(|i| i.len())
            .sum()
    }

    /// Ticks a given task held the CPU.
    pub fn total_runtime(&self, pid: &Pid) -> Tick {
        self.timeline
            .iter()
            .filter(|i| i.slot.pid() == Some(pid))
            .map(|i| i.len())
            .sum()
    }

    /// Number of separate intervals in which a task ran.
    pub fn schedule_count(&self, pid: &Pid) -> usize {
        self.timeline
            .iter()
            .filter(|i| i.slot.pid() == Some(pid))
            .count()
    }

    /// Who held the CPU on each tick, expanded from the timeline. `None`
    /// marks an idle tick.
    pub fn per_tick(&self) -> Vec<Option<Pid>> {
        self.timeline
            .iter()
            .flat_map(|i| std::iter::repeat(i.slot.pid().cloned()).take(i.len() as usize))
            .collect()
    }

    /// Events of one kind, in order.
    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Pretty-print the trace for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let name = match event.kind {
                EventKind::Arrival => "ARRIVE",
                EventKind::IoReturn => "IO-RET",
                EventKind::Dispatch => "RUN",
                EventKind::DepartToIo => "IO",
                EventKind::Finished => "DONE",
                EventKind::Idle => "IDLE",
            };
            match &event.task {
                Some(t) => eprintln!(
                    "[{:>6}] {:<6} pid={} cpu1={} io={} cpu2={}",
                    event.time, name, t.pid, t.cpu_burst1, t.io_time, t.cpu_burst2
                ),
                None => eprintln!("[{:>6}] {}", event.time, name),
            }
        }
        for interval in &self.timeline {
            let who = match &interval.slot {
                Slot::Idle => "idle".to_string(),
                Slot::Task(pid) => format!("pid={pid}"),
            };
            eprintln!("  [{:>6}, {:>6}) {}", interval.from, interval.to, who);
        }
    }
}
