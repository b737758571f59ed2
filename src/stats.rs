//! Aggregate metrics computed from a simulation trace.
//!
//! - **Utilization**: share of simulated ticks on which some task ran
//! - **Response time**: tick at which a process first held the CPU
//! - **Waiting time**: ticks a process spent in Ready without running
//!
//! Averages are taken over the processes that ran at least once. The idle
//! slot is not a process and never contributes. When nothing ran at all,
//! utilization and the averages are `NaN` (0 / 0).

use std::collections::HashMap;

use serde::Serialize;

use crate::trace::Trace;
use crate::types::{Pid, Tick};

/// Summary statistics for a distribution of tick counts.
#[derive(Debug, Clone, Default)]
pub struct DistributionStats {
    /// Number of samples.
    pub count: usize,
    /// Minimum value (or 0 if empty).
    pub min: Tick,
    /// Maximum value (or 0 if empty).
    pub max: Tick,
    /// Sum of all values.
    pub sum: Tick,
    sum_sq: u128,
}

impl DistributionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sample value.
    pub fn add(&mut self, value: Tick) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
        self.sum_sq += (value as u128) * (value as u128);
    }

    /// Mean value, `NaN` if empty.
    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.count as f64
    }

    /// Population standard deviation (0 for fewer than two samples).
    pub fn stddev(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            let mean = self.mean();
            let variance = (self.sum_sq as f64 / self.count as f64) - (mean * mean);
            variance.max(0.0).sqrt()
        }
    }
}

impl FromIterator<Tick> for DistributionStats {
    fn from_iter<I: IntoIterator<Item = Tick>>(iter: I) -> Self {
        let mut stats = DistributionStats::new();
        for v in iter {
            stats.add(v);
        }
        stats
    }
}

/// Per-process metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStats {
    #[serde(rename = "processId")]
    pub pid: Pid,
    /// `None` if the process never held the CPU.
    pub response_time: Option<Tick>,
    pub waiting_time: Tick,
}

/// Metrics reduced from a trace.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub total_time: Tick,
    pub idle_time: Tick,
    pub utilization: f64,
    /// In input order.
    pub processes: Vec<ProcessStats>,
    pub response: DistributionStats,
    pub waiting: DistributionStats,
}

impl Metrics {
    /// Reduce a trace.
    pub fn from_trace(trace: &Trace) -> Self {
        let total_time = trace.total_time();
        let idle_time = trace.idle_time();
        let utilization = (total_time - idle_time) as f64 / total_time as f64;

        // First interval per pid; the timeline is in time order.
        let mut first_run: HashMap<&Pid, Tick> = HashMap::new();
        for interval in trace.timeline() {
            if let Some(pid) = interval.slot.pid() {
                first_run.entry(pid).or_insert(interval.from);
            }
        }

        let processes: Vec<ProcessStats> = trace
            .pids()
            .iter()
            .map(|pid| ProcessStats {
                pid: pid.clone(),
                response_time: first_run.get(pid).copied(),
                waiting_time: trace.waiting_ticks(pid),
            })
            .collect();

        let responders = || processes.iter().filter(|p| p.response_time.is_some());
        let response = responders().filter_map(|p| p.response_time).collect();
        let waiting = responders().map(|p| p.waiting_time).collect();

        Metrics {
            total_time,
            idle_time,
            utilization,
            processes,
            response,
            waiting,
        }
    }

    pub fn average_response_time(&self) -> f64 {
        self.response.mean()
    }

    pub fn average_waiting_time(&self) -> f64 {
        self.waiting.mean()
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("Total time:          {}", self.total_time);
        println!("Idle time:           {}", self.idle_time);
        println!("Utilization:         {:.1}%", self.utilization * 100.0);
        println!(
            "Response time:       avg={:.2} min={} max={} stddev={:.2}",
            self.response.mean(),
            self.response.min,
            self.response.max,
            self.response.stddev()
        );
        println!(
            "Waiting time:        avg={:.2} min={} max={} stddev={:.2}",
            self.waiting.mean(),
            self.waiting.min,
            self.waiting.max,
            self.waiting.stddev()
        );
        println!();
        println!("{:>10} {:>10} {:>10}", "PID", "RESPONSE", "WAITING");
        for p in &self.processes {
            let response = p
                .response_time
                .map_or_else(|| "-".to_string(), |t| t.to_string());
            println!("{:>10} {:>10} {:>10}", p.pid, response, p.waiting_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Slot;
    use crate::types::TaskIdx;

    #[test]
    fn test_distribution_stats() {
        let stats: DistributionStats = [2, 4, 4, 4, 5, 5, 7, 9].into_iter().collect();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 9);
        assert!((stats.mean() - 5.0).abs() < 1e-9);
        assert!((stats.stddev() - 2.0).abs() < 1e-9);

        let empty = DistributionStats::new();
        assert!(empty.mean().is_nan());
        assert_eq!(empty.stddev(), 0.0);
    }

    #[test]
    fn test_metrics_exclude_idle_and_silent_processes() {
        let a = Pid::from("a");
        let b = Pid::from("b");
        let c = Pid::from("c");
        let mut trace = Trace::new(vec![a.clone(), b.clone(), c.clone()]);
        trace.extend_timeline(Slot::Idle, 0);
        trace.extend_timeline(Slot::Task(a.clone()), 1);
        trace.extend_timeline(Slot::Task(b.clone()), 2);
        trace.extend_timeline(Slot::Task(a.clone()), 3);
        trace.record_waiting(TaskIdx(1));
        trace.record_waiting(TaskIdx(0));

        let m = Metrics::from_trace(&trace);
        assert_eq!(m.total_time, 4);
        assert_eq!(m.idle_time, 1);
        assert!((m.utilization - 0.75).abs() < 1e-9);
        assert_eq!(m.processes[0].response_time, Some(1));
        assert_eq!(m.processes[1].response_time, Some(2));
        assert_eq!(m.processes[2].response_time, None);
        // c never ran, so neither average counts it.
        assert!((m.average_response_time() - 1.5).abs() < 1e-9);
        assert!((m.average_waiting_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_empty_trace_is_nan() {
        let m = Metrics::from_trace(&Trace::new(vec![]));
        assert_eq!(m.total_time, 0);
        assert!(m.utilization.is_nan());
        assert!(m.average_response_time().is_nan());
        assert!(m.average_waiting_time().is_nan());
    }
}
