//! Error types for the report command.

use crate::config::ConfigError;
use perfsheet_core::{PerfsheetError, SheetsError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Report(#[from] PerfsheetError),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl From<SheetsError> for CliError {
    fn from(err: SheetsError) -> Self {
        CliError::Report(err.into())
    }
}
