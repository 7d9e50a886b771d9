//! Log and trace formatting in simulated time.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::types::Time;

/// Width of the timestamp column, enough for `999_999_999`.
const TS_WIDTH: usize = 11;

/// A tick count with `_` between digit groups, right-aligned in the
/// timestamp column: `     12_345`.
pub struct FmtTs(pub Time);

impl fmt::Display for FmtTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>width$}", fmt_grouped(self.0), width = TS_WIDTH)
    }
}

pub(crate) fn fmt_grouped(v: u64) -> String {
    let digits = v.to_string();
    let head = match digits.len() % 3 {
        0 => 3,
        n => n,
    };
    let (first, rest) = digits.split_at(head);
    let mut out = String::from(first);
    for group in rest.as_bytes().chunks(3) {
        out.push('_');
        // Digits are ASCII.
        out.extend(group.iter().map(|&b| b as char));
    }
    out
}

/// `tracing` event formatter for simulator logs.
///
/// Engine events carry the simulated tick in a `t` field, which becomes
/// the leading timestamp column instead of wall-clock time. Events
/// without it get an empty column. Output is one line per event:
/// `[      1_024]  INFO message key=value ...`.
///
/// ```ignore
/// tracing_subscriber::fmt()
///     .with_env_filter(EnvFilter::from_default_env())
///     .event_format(SimFormat)
///     .try_init();
/// ```
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
        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        match fields.time {
            Some(t) => write!(writer, "[{}] ", FmtTs(t))?,
            None => write!(writer, "[{:width$}] ", "", width = TS_WIDTH)?,
        }

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            write!(writer, "{}{level:>5}\x1b[0m ", ansi_color(level))?;
        } else {
            write!(writer, "{level:>5} ")?;
        }

        writeln!(writer, "{}{}", fields.message, fields.rest)
    }
}

fn ansi_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG => "\x1b[34m",
        Level::TRACE => "\x1b[35m",
    }
}

/// Splits an event into its message, its `t` tick and a pre-rendered
/// ` key=value` tail.
#[derive(Default)]
struct FieldCollector {
    message: String,
    time: Option<Time>,
    rest: String,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: impl fmt::Display) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.rest, " {}={}", field.name(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format_args!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "t" => self.time = Some(value),
            _ => self.push(field, value),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value);
    }
}
