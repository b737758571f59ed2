//! The simulation report.

use std::io::Write;

use serde::Serialize;

use crate::policy::PolicyConfig;
use crate::stats::{Metrics, ProcessStats};
use crate::trace::{ListSnapshot, TimelineInterval, Trace, TraceEvent};
use crate::types::{Pid, Tick};

/// Everything a finished simulation reports.
///
/// Serializes with camelCase keys. Floating-point metrics are `NaN` when no
/// process ever ran; `serde_json` writes those as `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Policy that produced this result, e.g. `rr(quantum=2)`.
    pub policy: String,
    pub average_response_time: f64,
    pub average_waiting_time: f64,
    pub utilization: f64,
    pub total_time: Tick,
    pub idle_time: Tick,
    pub processes: Vec<ProcessStats>,
    pub timeline: Vec<TimelineInterval>,
    pub events: Vec<TraceEvent>,
    pub snapshots: Vec<ListSnapshot>,
}

impl SimulationResult {
    /// Reduce a finished trace produced under `config`.
    pub fn from_trace(config: &PolicyConfig, trace: Trace) -> Self {
        let metrics = Metrics::from_trace(&trace);
        SimulationResult {
            policy: config.to_string(),
            average_response_time: metrics.average_response_time(),
            average_waiting_time: metrics.average_waiting_time(),
            utilization: metrics.utilization,
            total_time: metrics.total_time,
            idle_time: metrics.idle_time,
            processes: metrics.processes,
            timeline: trace.timeline().to_vec(),
            events: trace.events().to_vec(),
            snapshots: trace.snapshots().to_vec(),
        }
    }

    fn process(&self, pid: &Pid) -> Option<&ProcessStats> {
        self.processes.iter().find(|p| &p.pid == pid)
    }

    /// Tick at which `pid` first ran.
    pub fn response_time(&self, pid: &Pid) -> Option<Tick> {
        self.process(pid).and_then(|p| p.response_time)
    }

    /// Ticks `pid` spent ready without running.
    pub fn waiting_time(&self, pid: &Pid) -> Option<Tick> {
        self.process(pid).map(|p| p.waiting_time)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json(&self, writer: impl Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}
