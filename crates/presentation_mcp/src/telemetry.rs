//! Logging setup
//!
//! All log output goes to stderr; stdout carries the MCP protocol.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Determine log filter level from verbosity count
#[must_use]
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter directive to use when `RUST_LOG` is unset
///
/// Any `-v` on the command line wins over the configured level.
#[must_use]
pub fn filter_directive(config: &LoggingConfig, verbose: u8) -> &str {
    if verbose > 0 {
        log_filter_from_verbosity(verbose)
    } else {
        &config.level
    }
}

/// Install the global tracing subscriber
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, verbose)));

    let json = config.format == LogFormat::Json;
    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| fmt::layer().with_target(true).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}
