//! perfsheet sheets - spreadsheet backends
//!
//! The report only ever needs three remote operations: resolve a worksheet by
//! title, read all of its values, and write one cell. [`SheetsBackend`] is
//! that seam. Worksheet handles are plain values passed into every call;
//! backends keep no notion of a "current" worksheet.

use async_trait::async_trait;
use perfsheet_core::{CellRef, Grid, SheetsResult, SpreadsheetKey};
use serde::{Deserialize, Serialize};

pub mod google;
pub mod memory;

pub use google::{
    AuthClock, FixedAuthClock, GoogleSheetsClient, ServiceAccountAuth, ServiceAccountKey,
    SystemAuthClock,
};
pub use memory::{CellWrite, InMemorySheets};

/// Handle to one worksheet (tab) of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Worksheet {
    pub spreadsheet: SpreadsheetKey,
    pub title: String,
    pub sheet_id: i64,
}

/// Remote spreadsheet operations used by the reporter.
///
/// Every call is an independent remote request. Nothing is transactional.
#[async_trait]
pub trait SheetsBackend: Send + Sync {
    /// Resolve a worksheet by its tab title.
    ///
    /// # Errors
    /// `SheetsError::WorksheetNotFound` if no tab has that title.
    async fn worksheet(&self, spreadsheet: &SpreadsheetKey, title: &str)
        -> SheetsResult<Worksheet>;

    /// Read every value of the worksheet.
    async fn get_all_values(&self, worksheet: &Worksheet) -> SheetsResult<Grid>;

    /// Write a single cell with user-entered semantics.
    ///
    /// # Errors
    /// `SheetsError::InvalidCell` for row 0 or column 0.
    async fn update_cell(
        &self,
        worksheet: &Worksheet,
        cell: CellRef,
        value: &str,
    ) -> SheetsResult<()>;
}
