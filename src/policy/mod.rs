//! Dispatch policies.
//!
//! A policy picks the task that runs during the current tick. The set of
//! policies is closed: [`Policy`] is an enum with one variant per
//! algorithm, built from a validated [`PolicyConfig`]. Each variant
//! implements [`Dispatch`].
//!
//! Contract with the engine: `dispatch` is only called with a non-empty
//! Ready list and must return a member of it. It may reorder Ready
//! (Round-Robin and MLFQ rotate) but never insert or remove; the engine
//! checks both after every call.

mod fcfs;
mod mlfq;
mod round_robin;
mod sjf;
mod srtf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use fcfs::Fcfs;
pub use mlfq::Mlfq;
pub use round_robin::RoundRobin;
pub use sjf::Sjf;
pub use srtf::Srtf;

use crate::error::{InputError, PolicyViolation};
use crate::lists::TaskList;
use crate::task::Task;
use crate::types::{TaskIdx, Tick};

/// The dispatch capability shared by all policies.
pub trait Dispatch {
    /// Short policy name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Pick the task to run this tick.
    fn dispatch(
        &mut self,
        ready: &mut TaskList,
        tasks: &mut [Task],
    ) -> Result<TaskIdx, PolicyViolation>;
}

/// Policy names accepted on the command line and in configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin,
    Mlfq,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Fcfs,
        PolicyKind::Sjf,
        PolicyKind::Srtf,
        PolicyKind::RoundRobin,
        PolicyKind::Mlfq,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Fcfs => "fcfs",
            PolicyKind::Sjf => "sjf",
            PolicyKind::Srtf => "srtf",
            PolicyKind::RoundRobin => "rr",
            PolicyKind::Mlfq => "mlfq",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" | "first-come-first-serve" => Ok(PolicyKind::Fcfs),
            "sjf" | "shortest-job-first" => Ok(PolicyKind::Sjf),
            "srtf" | "shortest-remaining" | "shortest-remaining-time-first" => {
                Ok(PolicyKind::Srtf)
            }
            "rr" | "round-robin" => Ok(PolicyKind::RoundRobin),
            "mlfq" | "multi-level-feedback" => Ok(PolicyKind::Mlfq),
            other => Err(InputError::InvalidPolicyParameter(format!(
                "unknown policy {other:?} (expected fcfs, sjf, srtf, rr or mlfq)"
            ))),
        }
    }
}

/// A validated policy selection with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum PolicyConfig {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin {
        quantum: Tick,
    },
    /// `level_quanta[n]` is the quantum of level `n`. Levels start at 1, so
    /// slot 0 is a placeholder and is not checked.
    Mlfq {
        level_quanta: Vec<Tick>,
    },
}

impl PolicyConfig {
    /// Build a config from a policy name and the optional parameters a
    /// front end collected. Parameters the policy does not use are ignored.
    pub fn from_parts(
        kind: PolicyKind,
        quantum: Option<Tick>,
        level_quanta: &[Tick],
    ) -> Result<Self, InputError> {
        let config = match kind {
            PolicyKind::Fcfs => PolicyConfig::Fcfs,
            PolicyKind::Sjf => PolicyConfig::Sjf,
            PolicyKind::Srtf => PolicyConfig::Srtf,
            PolicyKind::RoundRobin => PolicyConfig::RoundRobin {
                quantum: quantum.ok_or(InputError::MissingPolicyParameter {
                    policy: "rr",
                    parameter: "quantum",
                })?,
            },
            PolicyKind::Mlfq => {
                if level_quanta.is_empty() {
                    return Err(InputError::MissingPolicyParameter {
                        policy: "mlfq",
                        parameter: "level_quanta",
                    });
                }
                PolicyConfig::Mlfq {
                    level_quanta: level_quanta.to_vec(),
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            PolicyConfig::Fcfs => PolicyKind::Fcfs,
            PolicyConfig::Sjf => PolicyKind::Sjf,
            PolicyConfig::Srtf => PolicyKind::Srtf,
            PolicyConfig::RoundRobin { .. } => PolicyKind::RoundRobin,
            PolicyConfig::Mlfq { .. } => PolicyKind::Mlfq,
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), InputError> {
        match self {
            PolicyConfig::RoundRobin { quantum: 0 } => Err(InputError::InvalidPolicyParameter(
                "rr quantum must be greater than 0".into(),
            )),
            PolicyConfig::Mlfq { level_quanta } if level_quanta.is_empty() => {
                Err(InputError::MissingPolicyParameter {
                    policy: "mlfq",
                    parameter: "level_quanta",
                })
            }
            PolicyConfig::Mlfq { level_quanta } if level_quanta.len() < 2 => {
                Err(InputError::InvalidPolicyParameter(
                    "mlfq level_quanta needs a slot-0 placeholder and a quantum for level 1"
                        .into(),
                ))
            }
            PolicyConfig::Mlfq { level_quanta } => {
                match level_quanta.iter().skip(1).position(|&q| q == 0) {
                    Some(pos) => Err(InputError::InvalidPolicyParameter(format!(
                        "mlfq quantum for level {} must be greater than 0",
                        pos + 1
                    ))),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for PolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyConfig::RoundRobin { quantum } => write!(f, "rr(quantum={quantum})"),
            PolicyConfig::Mlfq { level_quanta } => {
                let quanta: Vec<String> = level_quanta.iter().map(|q| q.to_string()).collect();
                write!(f, "mlfq(level_quanta=[{}])", quanta.join(","))
            }
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// A dispatch policy instance with its per-run state.
#[derive(Debug, Clone)]
pub enum Policy {
    Fcfs(Fcfs),
    Sjf(Sjf),
    Srtf(Srtf),
    RoundRobin(RoundRobin),
    Mlfq(Mlfq),
}

impl Policy {
    /// Instantiate a fresh policy (no carried state) from a config.
    pub fn new(config: &PolicyConfig) -> Result<Self, InputError> {
        config.validate()?;
        Ok(match config {
            PolicyConfig::Fcfs => Policy::Fcfs(Fcfs),
            PolicyConfig::Sjf => Policy::Sjf(Sjf::new()),
            PolicyConfig::Srtf => Policy::Srtf(Srtf),
            PolicyConfig::RoundRobin { quantum } => Policy::RoundRobin(RoundRobin::new(*quantum)),
            PolicyConfig::Mlfq { level_quanta } => Policy::Mlfq(Mlfq::new(level_quanta.clone())),
        })
    }
}

impl Dispatch for Policy {
    fn name(&self) -> &'static str {
        match self {
            Policy::Fcfs(p) => p.name(),
            Policy::Sjf(p) => p.name(),
            Policy::Srtf(p) => p.name(),
            Policy::RoundRobin(p) => p.name(),
            Policy::Mlfq(p) => p.name(),
        }
    }

    fn dispatch(
        &mut self,
        ready: &mut TaskList,
        tasks: &mut [Task],
    ) -> Result<TaskIdx, PolicyViolation> {
        match self {
            Policy::Fcfs(p) => p.dispatch(ready, tasks),
            Policy::Sjf(p) => p.dispatch(ready, tasks),
            Policy::Srtf(p) => p.dispatch(ready, tasks),
            Policy::RoundRobin(p) => p.dispatch(ready, tasks),
            Policy::Mlfq(p) => p.dispatch(ready, tasks),
        }
    }
}

/// Ready task with the least work left in its active burst. Ties go to the
/// first one in list order.
fn shortest_active(ready: &TaskList, tasks: &[Task]) -> Option<TaskIdx> {
    let mut best: Option<(TaskIdx, Tick)> = None;
    for idx in ready.iter() {
        let remaining = tasks[idx.0].active_remaining();
        match best {
            Some((_, r)) if remaining >= r => {}
            _ => best = Some((idx, remaining)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::lists::TaskList;
    use crate::task::{Task, TaskDef};
    use crate::types::TaskIdx;

    /// Build an arena and a Ready list holding all of it, in order.
    /// Each entry is `(cpu_burst1, io_time, cpu_burst2)`.
    pub fn ready_set(bursts: &[(u64, u64, u64)]) -> (Vec<Task>, TaskList) {
        let tasks: Vec<Task> = bursts
            .iter()
            .enumerate()
            .map(|(i, &(c1, io, c2))| Task::new(&TaskDef::new(i as i64, 0, c1, io, c2)))
            .collect();
        let ready = (0..tasks.len()).map(TaskIdx).collect();
        (tasks, ready)
    }
}
