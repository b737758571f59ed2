//! ticksim - Deterministic tick-driven CPU scheduling simulator.
//!
//! Replays a batch of processes, each with an arrival time and two CPU
//! bursts separated by an I/O burst, one tick at a time under a chosen
//! dispatch policy, and reports the execution timeline together with
//! utilization, response and waiting times.
//!
//! # Architecture
//!
//! - **Engine**: tick loop moving tasks between New, Ready, Waiting-I/O and
//!   Terminated
//! - **Policies**: FCFS, SJF, SRTF, Round-Robin and MLFQ behind [`Dispatch`]
//! - **Trace**: event log, coalesced timeline and per-tick list snapshots
//! - **Stats**: reduction of a trace to [`SimulationResult`]
//!
//! # Usage
//!
//! ```rust,no_run
//! use ticksim::*;
//!
//! let scenario = Scenario::builder()
//!     .task(TaskDef::new("A", 0, 3, 0, 0))
//!     .task(TaskDef::new("B", 0, 3, 0, 0))
//!     .build()?;
//!
//! let result = Simulator::new(PolicyConfig::RoundRobin { quantum: 2 }).run(&scenario)?;
//! println!("{}", result.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod error;
pub mod fmt;
pub mod lists;
pub mod loader;
pub mod perfetto;
pub mod policy;
pub mod result;
pub mod scenario;
pub mod stats;
pub mod task;
pub mod trace;
pub mod types;
pub mod workloads;

// Re-export the main public types for convenience.
pub use engine::Simulator;
pub use error::{InputError, PolicyViolation, SimError};
pub use fmt::{sim_clock, FmtTick, SimFormat};
pub use loader::{load_csv, load_csv_str, load_json, load_path};
pub use policy::{Dispatch, Policy, PolicyConfig, PolicyKind};
pub use result::SimulationResult;
pub use scenario::{Scenario, DEFAULT_MAX_TICKS};
pub use stats::{DistributionStats, Metrics, ProcessStats};
pub use task::{Task, TaskDef, TaskState};
pub use trace::{EventKind, ListSnapshot, Slot, TimelineInterval, Trace, TraceEvent};
pub use types::{Pid, TaskIdx, Tick};
