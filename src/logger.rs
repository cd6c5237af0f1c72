use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::defines::DEFAULT_LOG_DIR;

/// Installs the global tracing subscriber: a per-invocation timestamped
/// log file under `logs/` capturing DEBUG and up, plus the console at
/// INFO (override with RUST_LOG). Returns the log file path.
pub fn setup_logging() -> io::Result<PathBuf> {
    let log_dir = Path::new(DEFAULT_LOG_DIR);
    fs::create_dir_all(log_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("quickfut_{}.log", timestamp));
    let log_file = File::create(&log_path)?;

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(LevelFilter::DEBUG),
        )
        .init();

    Ok(log_path)
}
