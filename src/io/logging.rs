use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`debug`, `tickle=trace`, ...)
pub const LOG_ENV: &str = "TICKLE_LOG";

/// Log file used while the TUI owns the terminal
pub fn log_file_path() -> PathBuf {
    crate::io::document::data_dir().join("tickle.log")
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr for CLI commands. Quiet unless `TICKLE_LOG` says otherwise.
pub fn init_cli_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to a file for the TUI so log lines never land on the alternate screen.
pub fn init_tui_logging(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
