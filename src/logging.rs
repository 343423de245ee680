//! Tracing initialization.
//! Builds a subscriber with EnvFilter, supports compact text or JSON, and optional file logging.
//!
//! Behavior:
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - The same format is used for stdout and the optional file layer.
//! - File logging is refused if any ancestor of the file path is a symlink.

use anyhow::{Result, anyhow};
use chrono::Local;
use farwrite::output as out;
use farwrite::{LogFormat, LogLevel, path_has_symlink_ancestor};
use std::fmt as stdfmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

fn env_filter_for(lvl: LogLevel) -> EnvFilter {
    EnvFilter::new(lvl.to_string())
}

fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tsfmt::layer()
        .with_timer(LocalHumanTime)
        .with_level(true)
        .with_target(true)
        .with_writer(writer);
    match format {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Text => base.compact().boxed(),
    }
}

#[cfg(unix)]
fn open_log_append(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_log_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Open `path` for appending behind a non-blocking writer, or explain why not.
fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), String> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => return Err("an ancestor directory is a symlink".into()),
        Err(e) => return Err(format!("cannot inspect path: {e}")),
    }
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = open_log_append(path).map_err(|e| e.to_string())?;
    Ok(tracing_appender::non_blocking(file))
}

/// Install the global subscriber. The returned guard must be held until exit
/// so the file writer flushes.
pub fn init_tracing(
    lvl: LogLevel,
    format: LogFormat,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let mut guard = None;
    let file_layer = match log_file.map(|p| (p, file_writer(p))) {
        Some((_, Ok((writer, g)))) => {
            guard = Some(g);
            Some(writer)
        }
        Some((p, Err(reason))) => {
            out::print_warn(&format!(
                "File logging to '{}' was not enabled ({reason}); logs continue on stdout.",
                p.display()
            ));
            None
        }
        None => None,
    };

    let stdout = registry()
        .with(env_filter_for(lvl))
        .with(fmt_layer(format, io::stdout));
    match file_layer {
        Some(writer) => stdout.with(fmt_layer(format, writer)).try_init(),
        None => stdout.try_init(),
    }
    .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}
