//! Log line formatting keyed to the game loop's iteration counter.
//!
//! Every line reads `HH:MM:SS.sssss 0xTICK LEVEL span{fields}: target: fields`,
//! where the tick is the loop iteration the event happened in.

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Loop iterations run so far, across every loop in the process.
static TICKS: AtomicU64 = AtomicU64::new(0);

/// Only the low 16 bits are printed.
const TICK_MASK: u64 = 0xFFFF;

const TIMESTAMP: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

/// ANSI styles, skipped entirely when the writer has no escapes.
#[derive(Clone, Copy)]
enum Style {
    Dim,
    Bold,
    Color(&'static str),
}

impl Style {
    fn prefix(self) -> &'static str {
        match self {
            Style::Dim => "\x1b[2m",
            Style::Bold => "\x1b[1m",
            Style::Color(code) => code,
        }
    }

    fn write(self, writer: &mut Writer<'_>, value: impl Display) -> fmt::Result {
        if writer.has_ansi_escapes() {
            write!(writer, "{}{}\x1b[0m", self.prefix(), value)
        } else {
            write!(writer, "{}", value)
        }
    }
}

/// The subscriber's event formatter: a timestamped, tick-stamped variant of the full format.
pub struct TickFormatter;

impl<S, N> FormatEvent<S, N> for TickFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let timestamp = OffsetDateTime::now_utc().format(&TIMESTAMP).map_err(|_| fmt::Error)?;
        Style::Dim.write(&mut writer, timestamp)?;
        writer.write_char(' ')?;

        Style::Dim.write(&mut writer, format_args!("0x{:04X}", get_tick_count() & TICK_MASK))?;
        writer.write_char(' ')?;

        let (style, label) = level_style(meta.level());
        style.write(&mut writer, format_args!("{:>5}", label))?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            let mut spans = 0;
            for span in scope.from_root() {
                Style::Bold.write(&mut writer, span.metadata().name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>().filter(|fields| !fields.is_empty()) {
                    Style::Bold.write(&mut writer, "{")?;
                    write!(writer, "{}", fields)?;
                    Style::Bold.write(&mut writer, "}")?;
                }
                Style::Dim.write(&mut writer, ':')?;
                spans += 1;
            }
            if spans > 0 {
                writer.write_char(' ')?;
            }
        }

        Style::Dim.write(&mut writer, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_style(level: &Level) -> (Style, &'static str) {
    match *level {
        Level::TRACE => (Style::Color("\x1b[35m"), "TRACE"),
        Level::DEBUG => (Style::Color("\x1b[34m"), "DEBUG"),
        Level::INFO => (Style::Color("\x1b[32m"), "INFO"),
        Level::WARN => (Style::Color("\x1b[33m"), "WARN"),
        Level::ERROR => (Style::Color("\x1b[31m"), "ERROR"),
    }
}

/// Marks the start of a new loop iteration.
pub fn increment_tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

pub fn get_tick_count() -> u64 {
    TICKS.load(Ordering::Relaxed)
}
