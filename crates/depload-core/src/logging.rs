//! Logging init for hosts: file under the XDG state dir, stderr as fallback.
//!
//! Hosts embedding the loader usually install their own subscriber; these
//! helpers are for binaries that don't. Both use `try_init`, so a second call
//! (or a host subscriber already in place) is not an error.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,depload=debug,depload_core=debug";

/// Shared handle to the append-only log file. Each event gets a cloned fd;
/// if cloning fails the event goes to stderr instead of being dropped.
struct LogFile(Arc<fs::File>);

enum LogSink {
    File(fs::File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogSink::File)
            .unwrap_or(LogSink::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/depload/depload.log`
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("depload")?;
    Ok(xdg_dirs.get_state_home().join("depload.log"))
}

/// Initialize structured logging to [`log_file_path`].
/// On failure (e.g. log dir unwritable), returns Err so the caller can fall back to stderr.
pub fn init_logging() -> Result<()> {
    let log_file_path = log_file_path()?;
    if let Some(dir) = log_file_path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .with_context(|| format!("open log file {}", log_file_path.display()))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(LogFile(Arc::new(file)))
        .with_ansi(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!("depload logging initialized at {}", log_file_path.display());
    }
    Ok(())
}

/// Initialize logging to stderr only. Use when `init_logging()` fails so the
/// host still gets log output.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
