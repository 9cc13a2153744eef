//! # Telemetry
//!
//! Structured logging via `tracing`. Logs go to stderr so that stdout stays
//! free for the reassembled byte stream.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.to_string()))
        .context("Failed to build log filter")?;

    let json_layer = config.json_format.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(config.include_file_line)
            .with_file(config.include_file_line)
    });
    let text_layer = (!config.json_format).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(config.include_file_line)
            .with_file(config.include_file_line)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(level = %config.level, json = config.json_format, "Logging initialized");
    Ok(())
}
