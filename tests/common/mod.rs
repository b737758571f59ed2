#![allow(dead_code)]

use ticksim::{PolicyConfig, Scenario, SimFormat, SimulationResult, Simulator, TaskDef, Trace};

/// Initialize tracing from `RUST_LOG`.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .event_format(SimFormat)
        .try_init();
}

/// Build a scenario with a generous tick bound.
pub fn scenario(defs: Vec<TaskDef>) -> Scenario {
    Scenario::builder()
        .tasks(defs)
        .max_ticks(10_000)
        .build()
        .unwrap()
}

pub fn trace(config: PolicyConfig, defs: Vec<TaskDef>) -> Trace {
    let trace = Simulator::new(config).trace(&scenario(defs)).unwrap();
    trace.dump();
    trace
}

pub fn run(config: PolicyConfig, defs: Vec<TaskDef>) -> SimulationResult {
    Simulator::new(config).run(&scenario(defs)).unwrap()
}

/// Who ran on each tick as a string, one character per tick: the first
/// character of the pid, or `.` when idle.
pub fn schedule(trace: &Trace) -> String {
    trace
        .per_tick()
        .iter()
        .map(|slot| match slot {
            Some(pid) => pid.to_string().chars().next().unwrap_or('?'),
            None => '.',
        })
        .collect()
}

/// Float comparison for metrics.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
