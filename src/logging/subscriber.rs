//! Tracing setup: console formatter, run log layer, and initialisation.
//!
//! Both outputs share [`Kind`] to classify an event and [`EventText`] to
//! collect its message plus structured fields such as `link`, `site` or
//! `error`.
use std::fmt::{self, Write as _};
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target used by [`Logger::stage`](super::Logger::stage).
pub(super) const STAGE_TARGET: &str = "dotlink::stage";

/// Target used by [`Logger::dry_run`](super::Logger::dry_run).
pub(super) const DRY_RUN_TARGET: &str = "dotlink::dry_run";

/// How an event is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Detail,
}

impl Kind {
    fn of(metadata: &Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Detail,
        }
    }

    /// Indented tag written in front of the message in the run log.
    const fn file_tag(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::DryRun => "    [dry run] ",
            Self::Error => "    [error] ",
            Self::Warn => "    [warn] ",
            Self::Info => "    ",
            Self::Detail => "    [debug] ",
        }
    }
}

/// Message and structured fields of one event, in recording order.
#[derive(Debug, Default)]
struct EventText {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl EventText {
    fn of(event: &Event<'_>) -> Self {
        let mut text = Self::default();
        event.record(&mut text);
        text
    }

    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }

    /// `message key=value key=value`.
    fn render(&self) -> String {
        let mut out = self.message.clone();
        for (name, value) in &self.fields {
            write!(out, " {name}={value}").ok();
        }
        out
    }
}

impl Visit for EventText {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Appends every event to the run log, one timestamped line each, with ANSI
/// codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the run log for `command` under the cache directory.
    ///
    /// Returns `None` if the directory or the file cannot be created.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::create(&log_file_path(command)?).ok()
    }

    /// Truncate `path` and start a new run with a header line.
    pub(super) fn create(path: &Path) -> io::Result<Self> {
        let version =
            option_env!("DOTLINK_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let mut file = fs::File::create(path)?;
        writeln!(
            file,
            "--- dotlink {version} run started {} UTC ---",
            format_utc_datetime()
        )?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: Subscriber> Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let tag = Kind::of(event.metadata()).file_tag();
        let text = strip_ansi(&EventText::of(event).render());
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "[{}] {tag}{text}", format_utc_time()).ok();
        }
    }
}

/// Console output: `==>` stages, `[DRY RUN]` notices, coloured warnings and
/// errors, and dimmed debug lines that include the structured fields.
struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
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
        let text = EventText::of(event);
        let msg = &text.message;
        match Kind::of(event.metadata()) {
            Kind::Error => writeln!(writer, "\x1b[31mERROR\x1b[0m {}", text.render()),
            Kind::Warn => writeln!(writer, "\x1b[33mWARN\x1b[0m  {}", text.render()),
            Kind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::DryRun => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Kind::Info => writeln!(writer, "  {msg}"),
            Kind::Detail => writeln!(writer, "  \x1b[2m{}\x1b[0m", text.render()),
        }
    }
}

/// Install the global subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout; debug lines
/// reach the console only when `verbose` is set. The run log at
/// `$XDG_CACHE_HOME/dotlink/<command>.log` always receives debug and above.
/// Call once, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = io::stderr
        .with_max_level(Level::WARN)
        .and(io::stdout.with_min_level(Level::INFO));
    let console = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(writer)
        .with_filter(console_level);
    let run_log = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console)
        .with(run_log)
        .init();
}
