//! Logging setup.
//!
//! Output goes to stderr so that command output on stdout stays parseable.
//! `RUST_LOG`, when set, overrides the configured level.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LoggingConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console output.
    Console,
    /// JSON structured logging.
    Json,
}

impl LogFormat {
    fn from_name(name: &str) -> Self {
        match name {
            "json" => LogFormat::Json,
            _ => LogFormat::Console,
        }
    }
}

/// Level name for a CLI verbosity count, never quieter than `base`.
pub fn level_for_verbosity(base: &str, verbose: u8) -> &str {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let start = LEVELS.iter().position(|l| *l == base).unwrap_or(1);
    LEVELS[(start + usize::from(verbose)).min(LEVELS.len() - 1)]
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = match LogFormat::from_name(&config.format) {
        LogFormat::Console => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .json()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity("warn", 0), "warn");
        assert_eq!(level_for_verbosity("warn", 1), "info");
        assert_eq!(level_for_verbosity("warn", 2), "debug");
        assert_eq!(level_for_verbosity("warn", 9), "trace");
        assert_eq!(level_for_verbosity("info", 1), "debug");
    }

    #[test]
    fn test_format_names() {
        assert_eq!(LogFormat::from_name("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("console"), LogFormat::Console);
    }
}
