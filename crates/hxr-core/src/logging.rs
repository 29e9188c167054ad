//! Subscriber setup for the `hxr` binary and embedders.
//!
//! Events go to `$XDG_STATE_HOME/hxr/hxr.log` when that file can be opened,
//! otherwise to stderr. `RUST_LOG` replaces the default filter.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,hxr=debug,hxr_core=debug";

/// Append-mode log file shared by every event; `&File` is itself a writer,
/// so no per-event handle is opened.
#[derive(Clone)]
struct LogFile(Arc<fs::File>);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = &'a fs::File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.0
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Path of the log file, creating its directory.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hxr")?;
    let log_dir = xdg_dirs.get_state_home();
    fs::create_dir_all(&log_dir)?;
    Ok(log_dir.join("hxr.log"))
}

/// Install the file subscriber. Errors if the state dir is unwritable or a
/// global subscriber is already set; callers fall back to `init_logging_stderr`.
pub fn init_logging() -> Result<()> {
    let path = log_path()?;
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(LogFile(Arc::new(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;

    tracing::info!("hxr logging initialized at {}", path.display());
    Ok(())
}

pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
