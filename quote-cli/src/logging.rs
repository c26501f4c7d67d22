//! Log output for `motor-quote`.
//!
//! Reports go to stdout, so log lines always go to stderr. The filter is
//! fixed at startup: `--log-level` wins over `RUST_LOG`, and both fall back
//! to [`DEFAULT_FILTER`]. With `--log-file` every line is also appended to
//! that file, stamped with a full date instead of the console's clock time.

use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Filter used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// One log line: `<time> <LEVEL> <module>: <fields>`.
struct LineFormat {
    clock: &'static str,
}

impl LineFormat {
    const CONSOLE: Self = Self {
        clock: "%H:%M:%S%.3f",
    };
    const FILE: Self = Self {
        clock: "%Y-%m-%dT%H:%M:%S%.3f%:z",
    };
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG => "\x1b[34m",
        Level::TRACE => "\x1b[35m",
    }
}

/// Last path segment of a tracing target, e.g. `premium` for
/// `quote_core::calculations::premium`.
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let time = Local::now().format(self.clock);
        let target = short_target(meta.target());

        if writer.has_ansi_escapes() {
            write!(
                writer,
                "\x1b[2m{time}\x1b[0m {}{:<5}\x1b[0m \x1b[2m{target}:\x1b[0m ",
                level_color(*meta.level()),
                meta.level()
            )?;
        } else {
            write!(writer, "{time} {:<5} {target}: ", meta.level())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Picks the active filter directive: the command-line level, then the
/// environment, then [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Fails when the chosen directive is not a valid `EnvFilter`.
pub fn resolve_filter(
    cli_level: Option<&str>,
    env_level: Option<&str>,
) -> Result<EnvFilter> {
    let directive = cli_level
        .or(env_level)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directive).with_context(|| format!("Invalid log level '{directive}'"))
}

/// Installs the global subscriber. Call once, before any command runs.
///
/// # Errors
///
/// Fails on an invalid level or when `log_file` cannot be opened for
/// appending.
pub fn init(
    log_level: Option<&str>,
    log_file: Option<&Path>,
) -> Result<()> {
    let env_level = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = resolve_filter(log_level, env_level.as_deref())?;

    let console = tracing_subscriber::fmt::layer()
        .event_format(LineFormat::CONSOLE)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file = log_file
        .map(|path| {
            File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))
        })
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat::FILE)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("Logging was already initialized")
}

/// Records a failed command in the log before it is reported to the user.
pub fn log_command_error(
    command: &'static str,
    result: &Result<()>,
) {
    if let Err(error) = result {
        error!(command, error = %format!("{error:#}"), "command failed");
    }
}
