//! Error types for perfsheet operations

use thiserror::Error;

/// Spreadsheet backend errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SheetsError {
    #[error("Worksheet not found: '{title}' in spreadsheet {spreadsheet}")]
    WorksheetNotFound { spreadsheet: String, title: String },

    #[error("Invalid cell ({row}, {col}): coordinates are 1-based")]
    InvalidCell { row: u32, col: u32 },

    #[error("Request to {operation} failed with status {status}: {message}")]
    RequestFailed {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Transport error during {operation}: {reason}")]
    Transport { operation: String, reason: String },

    #[error("Invalid response from {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },

    #[error("Authentication failed: {reason}")]
    Auth { reason: String },

    #[error("Backend lock poisoned")]
    LockPoisoned,
}

/// Report workflow errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Unknown environment: {name}")]
    UnknownEnvironment { name: String },

    #[error("No row in 'Timestamps' matches hash {hash} / app hash {app_hash}")]
    RowNotFound { hash: String, app_hash: String },

    #[error("Column {col} has no Runtime pair: 2*col-7 must be >= 1")]
    InvalidRuntimeColumn { col: u32 },
}

/// Master error type for all perfsheet errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PerfsheetError {
    #[error("Sheets error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Result type alias for backend operations.
pub type SheetsResult<T> = Result<T, SheetsError>;

/// Result type alias for perfsheet operations.
pub type PerfsheetResult<T> = Result<T, PerfsheetError>;

// =============================================================================
// TESTS
// =============================================================================
