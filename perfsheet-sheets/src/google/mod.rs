//! Google Sheets v4 backend

mod auth;
mod client;
pub mod types;

pub use auth::{
    AuthClock, FixedAuthClock, ServiceAccountAuth, ServiceAccountKey, SystemAuthClock,
    DEFAULT_TOKEN_URI, SHEETS_SCOPE,
};
pub use client::{cell_range, sheet_range, GoogleSheetsClient};

use perfsheet_core::SheetsError;

pub(crate) fn transport(operation: &str, err: reqwest::Error) -> SheetsError {
    SheetsError::Transport {
        operation: operation.to_string(),
        reason: err.to_string(),
    }
}

pub(crate) fn invalid_response(operation: &str, reason: impl Into<String>) -> SheetsError {
    SheetsError::InvalidResponse {
        operation: operation.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn request_failed(
    operation: &str,
    status: u16,
    message: impl Into<String>,
) -> SheetsError {
    SheetsError::RequestFailed {
        operation: operation.to_string(),
        status,
        message: message.into(),
    }
}

pub(crate) fn auth_failed(reason: impl Into<String>) -> SheetsError {
    SheetsError::Auth {
        reason: reason.into(),
    }
}
