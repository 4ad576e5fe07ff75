//! Tracing setup for the binary.
//!
//! Console events go to stderr so stdout stays clean for `find` output. An
//! optional log file gets its own non-blocking layer with the same format.
//! The level comes from [`LogLevel`]; `RUST_LOG` is not consulted.

use anyhow::Result;
use chrono::Local;
use fstree::output as out;
use fstree::{LogLevel, default_log_path, path_has_symlink_ancestor};
use std::fmt as stdfmt;
use std::fs::OpenOptions;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// DD/MM/YY HH:MM:SS in local time.
struct LocalHumanTime;

impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

fn env_filter(lvl: &LogLevel) -> EnvFilter {
    EnvFilter::new(match lvl {
        LogLevel::Quiet => "error",
        LogLevel::Normal => "info",
        LogLevel::Info => "debug",
        LogLevel::Debug => "trace",
    })
}

/// One fmt layer. File output keeps targets and drops ANSI colours.
fn fmt_layer<W>(json: bool, to_file: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        tsfmt::layer()
            .json()
            .with_timer(LocalHumanTime)
            .with_target(true)
            .with_writer(writer)
            .boxed()
    } else {
        tsfmt::layer()
            .compact()
            .with_timer(LocalHumanTime)
            .with_target(to_file)
            .with_ansi(!to_file)
            .with_writer(writer)
            .boxed()
    }
}

/// Open `path` for appending behind a non-blocking writer, or say on stderr why not.
fn open_log_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => {
            eprintln!("Refusing file logging: an ancestor of {} is a symlink.", path.display());
            return None;
        }
        Err(e) => {
            eprintln!("Cannot check log path {} for symlinks: {e}", path.display());
            return None;
        }
    }

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", path.display());
            None
        }
    }
}

/// Install the global subscriber. The returned guard flushes the log file on
/// drop and must be held until exit.
pub fn init_tracing(lvl: &LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let mut layers = vec![fmt_layer(json, false, std::io::stderr)];
    let mut guard = None;

    if let Some(path) = log_file {
        match open_log_writer(path) {
            Some((writer, g)) => {
                layers.push(fmt_layer(json, true, writer));
                guard = Some(g);
            }
            None => {
                out::print_warn(&format!(
                    "File logging to '{}' is disabled; logs continue on stderr.",
                    path.display()
                ));
                if let Ok(def) = default_log_path() {
                    out::print_warn(&format!("The default log path may work instead: {}", def.display()));
                }
            }
        }
    }

    registry().with(layers).with(env_filter(lvl)).try_init()?;
    Ok(guard)
}
