//! Log setup. The terminal belongs to the UI, so logs go to a daily file.

use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when RUST_LOG is unset.
pub const DEFAULT_FILTER: &str = "marquee=info";

/// Install the global subscriber writing to `<log_dir>/marquee.log.<date>`.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes and stops the writer.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
  std::fs::create_dir_all(log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let (writer, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, "marquee.log"));

  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
    .map_err(|e| eyre!("Invalid log filter: {}", e))?;

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(writer).with_ansi(false))
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  Ok(guard)
}
