//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, ResultExt};

/// Initialize the logging subsystem
///
/// Logs are written to stderr and to `~/.local/share/craftwarden/logs/`.
/// Log level is controlled by the `CRAFTWARDEN_LOG` environment variable.
///
/// # Examples
/// ```bash
/// CRAFTWARDEN_LOG=debug craftwarden
/// CRAFTWARDEN_LOG=trace craftwarden
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "craftwarden.log");

    // Default to info, allow override via CRAFTWARDEN_LOG
    let env_filter = EnvFilter::try_from_env("CRAFTWARDEN_LOG")
        .unwrap_or_else(|_| EnvFilter::new("craftwarden=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::new("%H:%M:%S%.3f".to_string())),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("craftwarden starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("craftwarden").join("logs"))
}
