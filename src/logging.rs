//! File logging. The dialog owns the terminal, so nothing is logged to it.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Environment variable holding the log filter, e.g. `SWISH_LOG=debug`
pub const LOG_ENV: &str = "SWISH_LOG";
const DEFAULT_FILTER: &str = "info";

/// Returns the log file path (~/.swish/swish.log)
pub fn log_path() -> Option<PathBuf> {
    Settings::config_dir().map(|d| d.join("swish.log"))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber writing to `path`, appending.
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // Owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }

    let subscriber = tracing_subscriber::registry().with(filter()).with(
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false),
    );
    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)?;

    tracing::info!(path = %path.display(), version = env!("CARGO_PKG_VERSION"), "logging initialized");
    Ok(())
}
