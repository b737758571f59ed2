//! Chrome Trace Event Format (JSON) export for Perfetto.
//!
//! Writes the simulation trace as a JSON file loadable in
//! [ui.perfetto.dev](https://ui.perfetto.dev). The single simulated CPU is
//! one Perfetto process named "CPU 0" with a "running" thread; each
//! timeline interval becomes a complete slice, and task state changes
//! become instant events. One tick is rendered as one millisecond.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::trace::{EventKind, Slot, Trace};
use crate::types::Tick;

/// Trace timestamps are microseconds.
const US_PER_TICK: Tick = 1_000;

/// Write the trace as Chrome Trace Event Format JSON.
///
/// Events are streamed one at a time.
pub(crate) fn write_json(trace: &Trace, writer: &mut impl Write) -> std::io::Result<()> {
    writer.write_all(b"{\"traceEvents\":[")?;

    let mut need_comma = false;

    let metadata = [
        json!({
            "ph": "M",
            "pid": 0,
            "tid": 0,
            "name": "process_name",
            "args": { "name": "CPU 0" }
        }),
        json!({
            "ph": "M",
            "pid": 0,
            "tid": 0,
            "name": "thread_name",
            "args": { "name": "running" }
        }),
    ];
    for value in &metadata {
        write_value(writer, &mut need_comma, value)?;
    }

    for interval in trace.timeline() {
        let (name, cat, args) = match &interval.slot {
            Slot::Idle => ("idle".to_string(), "idle", json!({})),
            Slot::Task(pid) => (pid.to_string(), "sched", json!({ "pid": pid })),
        };
        let value = json!({
            "ph": "X",
            "pid": 0,
            "tid": 0,
            "ts": interval.from * US_PER_TICK,
            "dur": interval.len() * US_PER_TICK,
            "name": name,
            "cat": cat,
            "args": args
        });
        write_value(writer, &mut need_comma, &value)?;
    }

    for event in trace.events() {
        let name = match event.kind {
            EventKind::Arrival => "arrival",
            EventKind::IoReturn => "io_return",
            EventKind::DepartToIo => "io_start",
            EventKind::Finished => "finished",
            // Shown by the slices.
            EventKind::Dispatch | EventKind::Idle => continue,
        };
        let value = json!({
            "ph": "i",
            "pid": 0,
            "tid": 0,
            "ts": event.time * US_PER_TICK,
            "name": name,
            "cat": "state",
            "s": "t",
            "args": { "pid": event.pid() }
        });
        write_value(writer, &mut need_comma, &value)?;
    }

    writer.write_all(b"]}")?;
    Ok(())
}

fn write_value(
    writer: &mut impl Write,
    need_comma: &mut bool,
    value: &Value,
) -> std::io::Result<()> {
    if *need_comma {
        writer.write_all(b",")?;
    }
    *need_comma = true;
    serde_json::to_writer(&mut *writer, value)?;
    Ok(())
}

impl Trace {
    /// Write the trace as Perfetto-loadable JSON.
    pub fn write_perfetto_json(&self, writer: &mut impl Write) -> std::io::Result<()> {
        write_json(self, writer)
    }

    /// Write the trace as Perfetto-loadable JSON to a file.
    pub fn save_perfetto(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        write_json(self, &mut writer)?;
        writer.flush()
    }
}
