//! Log formatting keyed on simulated time.
//!
//! The engine publishes the current tick to a thread-local before it logs
//! anything, and [`SimFormat`] stamps every log line with it instead of a
//! wall-clock timestamp. Simulations on different threads keep separate
//! clocks.

use std::cell::Cell;
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::types::Tick;

thread_local! {
    static SIM_CLOCK: Cell<Option<Tick>> = const { Cell::new(None) };
}

/// The tick of the simulation running on this thread, if any.
pub fn sim_clock() -> Option<Tick> {
    SIM_CLOCK.with(|c| c.get())
}

pub(crate) fn set_sim_clock(tick: Tick) {
    SIM_CLOCK.with(|c| c.set(Some(tick)));
}

pub(crate) fn clear_sim_clock() {
    SIM_CLOCK.with(|c| c.set(None));
}

/// Tick stamp for log lines, right-aligned to six digits.
///
/// - `[tick      7]` while a simulation runs
/// - `[tick      -]` outside of one
pub struct FmtTick(pub Option<Tick>);

impl fmt::Display for FmtTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => write!(f, "tick {t:>6}"),
            None => write!(f, "tick {:>6}", "-"),
        }
    }
}

/// Event formatter that shows the simulated tick instead of wall-clock
/// time and uses plain colored level names.
pub struct SimFormat;

impl<S, N> FormatEvent<S, N> for SimFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}] ", FmtTick(sim_clock()))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::ERROR => "\x1b[31m",
                Level::WARN => "\x1b[33m",
                Level::INFO => "\x1b[32m",
                Level::DEBUG => "\x1b[34m",
                Level::TRACE => "\x1b[35m",
            };
            write!(writer, "{color}{level:>5}\x1b[0m ")?;
        } else {
            write!(writer, "{level:>5} ")?;
        }

        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        write!(writer, "{}", visitor.message)?;
        for (key, value) in &visitor.fields {
            write!(writer, " {key}={value}")?;
        }

        writeln!(writer)
    }
}

/// Collects the message and key-value fields of an event.
#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, format!("{value:.3}"));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}
