//! Builder helpers for common task shapes.
//!
//! Each function returns [`TaskDef`]s for a well-known archetype. They are
//! composed into scenarios by tests and benchmarks.

use crate::task::TaskDef;
use crate::types::{Pid, Tick};

/// Pure CPU-bound task: one burst, no I/O.
pub fn cpu_bound(pid: impl Into<Pid>, arrival: Tick, burst: Tick) -> TaskDef {
    TaskDef::new(pid, arrival, burst, 0, 0)
}

/// I/O-bound task: two short bursts around a long I/O wait.
///
/// # Panics
/// Panics if `burst` is zero.
pub fn io_bound(pid: impl Into<Pid>, arrival: Tick, burst: Tick, io: Tick) -> TaskDef {
    assert!(burst > 0, "io_bound burst must be positive");
    TaskDef::new(pid, arrival, burst, io, burst)
}

/// `n` identical CPU-bound tasks with integer pids `1..=n`, arriving every
/// `spacing` ticks starting at 0.
pub fn staggered(n: usize, spacing: Tick, burst: Tick) -> Vec<TaskDef> {
    (0..n)
        .map(|i| cpu_bound(i as i64 + 1, i as Tick * spacing, burst))
        .collect()
}

/// A deterministic blend of CPU- and I/O-bound tasks with integer pids
/// `1..=n`. Every third task does I/O; burst lengths cycle through 1..=7.
pub fn mixed(n: usize) -> Vec<TaskDef> {
    (0..n)
        .map(|i| {
            let pid = i as i64 + 1;
            let arrival = (i as Tick * 3) / 2;
            let burst = (i as Tick * 5) % 7 + 1;
            if i % 3 == 2 {
                io_bound(pid, arrival, burst, (i as Tick % 4) + 1)
            } else {
                cpu_bound(pid, arrival, burst)
            }
        })
        .collect()
}
