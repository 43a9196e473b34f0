//! Structured Logger
//!
//! Wraps `tracing` with a console layer, an optional daily-rotated NDJSON file,
//! and `RUST_LOG`-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "icebot.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over `level`. With a `log_dir`, events are also written as
/// NDJSON to `icebot.log.YYYY-MM-DD` there. Calling this twice is harmless.
pub fn init_logger<P: AsRef<Path>>(level: &str, log_dir: Option<P>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    // Logs go to stderr so CLI output on stdout stays clean.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        init_logger("info", Some(dir.path()));
        init_logger("debug", None::<&Path>);
        tracing::info!(target: "icebot_events", "logger ready");
    }
}
