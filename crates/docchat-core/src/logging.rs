//! Tracing setup.
//!
//! Non-interactive commands log to stderr. The chat UI owns the terminal, so it
//! logs to a daily-rotated file under `$DOCCHAT_HOME/logs` instead.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "DOCCHAT_LOG";

/// Where log lines go.
pub enum LogTarget<'a> {
    Stderr,
    File { dir: &'a Path },
}

fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the life of
/// the process. It is `None` for stderr logging.
pub fn init(target: &LogTarget<'_>, default_filter: &str) -> Result<Option<WorkerGuard>> {
    let filter = filter(default_filter);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| anyhow!("Failed to install logger: {e}"))?;
            Ok(None)
        }
        LogTarget::File { dir } => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "docchat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .try_init()
                .map_err(|e| anyhow!("Failed to install logger: {e}"))?;
            Ok(Some(guard))
        }
    }
}
