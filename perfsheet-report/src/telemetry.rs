//! Logging setup.
//!
//! Everything goes to stderr; stdout is reserved for the report lines.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::CliError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CliError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| CliError::Logging(format!("invalid filter: {}", e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| CliError::Logging(e.to_string()))?;

    tracing::debug!(filter = %config.filter, format = ?config.format, "Logging initialized");
    Ok(())
}
