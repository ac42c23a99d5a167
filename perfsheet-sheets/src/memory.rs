//! In-memory spreadsheet backend for tests and dry runs.

use crate::{SheetsBackend, Worksheet};
use async_trait::async_trait;
use perfsheet_core::{CellRef, Grid, SheetsError, SheetsResult, SpreadsheetKey};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// One recorded `update_cell` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub spreadsheet: SpreadsheetKey,
    pub worksheet: String,
    pub cell: CellRef,
    pub value: String,
}

#[derive(Debug, Clone)]
struct Tab {
    sheet_id: i64,
    title: String,
    grid: Grid,
}

/// Thread-safe in-memory workbook collection.
///
/// Reads return trimmed grids like the values API, writes grow the grid, and
/// every accepted write is appended to an ordered log.
#[derive(Debug, Clone, Default)]
pub struct InMemorySheets {
    books: Arc<RwLock<HashMap<SpreadsheetKey, Vec<Tab>>>>,
    writes: Arc<RwLock<Vec<CellWrite>>>,
}

impl InMemorySheets {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a worksheet in a spreadsheet.
    pub fn insert_worksheet(
        &self,
        spreadsheet: &SpreadsheetKey,
        title: &str,
        grid: Grid,
    ) -> SheetsResult<()> {
        let mut books = self.books.write().map_err(|_| SheetsError::LockPoisoned)?;
        let tabs = books.entry(spreadsheet.clone()).or_default();
        if let Some(tab) = tabs.iter_mut().find(|t| t.title == title) {
            tab.grid = grid;
            return Ok(());
        }
        let sheet_id = tabs.len() as i64;
        tabs.push(Tab {
            sheet_id,
            title: title.to_string(),
            grid,
        });
        Ok(())
    }

    /// Current contents of a worksheet, trimmed.
    ///
    /// `None` for an unknown worksheet or a poisoned lock.
    pub fn grid(&self, spreadsheet: &SpreadsheetKey, title: &str) -> Option<Grid> {
        self.snapshot(spreadsheet, title).ok().flatten()
    }

    fn snapshot(&self, spreadsheet: &SpreadsheetKey, title: &str) -> SheetsResult<Option<Grid>> {
        let books = self.books.read().map_err(|_| SheetsError::LockPoisoned)?;
        Ok(books
            .get(spreadsheet)
            .and_then(|tabs| tabs.iter().find(|t| t.title == title))
            .map(|t| Grid::new(t.grid.rows().to_vec())))
    }

    /// Every accepted write, in call order.
    pub fn writes(&self) -> Vec<CellWrite> {
        self.writes.read().map(|w| w.clone()).unwrap_or_default()
    }

    /// Accepted writes that targeted one worksheet title.
    pub fn writes_to(&self, title: &str) -> Vec<CellWrite> {
        self.writes()
            .into_iter()
            .filter(|w| w.worksheet == title)
            .collect()
    }
}

#[async_trait]
impl SheetsBackend for InMemorySheets {
    async fn worksheet(
        &self,
        spreadsheet: &SpreadsheetKey,
        title: &str,
    ) -> SheetsResult<Worksheet> {
        let books = self.books.read().map_err(|_| SheetsError::LockPoisoned)?;
        books
            .get(spreadsheet)
            .and_then(|tabs| tabs.iter().find(|t| t.title == title))
            .map(|tab| Worksheet {
                spreadsheet: spreadsheet.clone(),
                title: tab.title.clone(),
                sheet_id: tab.sheet_id,
            })
            .ok_or_else(|| SheetsError::WorksheetNotFound {
                spreadsheet: spreadsheet.to_string(),
                title: title.to_string(),
            })
    }

    async fn get_all_values(&self, worksheet: &Worksheet) -> SheetsResult<Grid> {
        self.snapshot(&worksheet.spreadsheet, &worksheet.title)?
            .ok_or_else(|| SheetsError::WorksheetNotFound {
                spreadsheet: worksheet.spreadsheet.to_string(),
                title: worksheet.title.clone(),
            })
    }

    async fn update_cell(
        &self,
        worksheet: &Worksheet,
        cell: CellRef,
        value: &str,
    ) -> SheetsResult<()> {
        let cell = CellRef::new(cell.row, cell.col)?;
        {
            let mut books = self.books.write().map_err(|_| SheetsError::LockPoisoned)?;
            let tab = books
                .get_mut(&worksheet.spreadsheet)
                .and_then(|tabs| tabs.iter_mut().find(|t| t.title == worksheet.title))
                .ok_or_else(|| SheetsError::WorksheetNotFound {
                    spreadsheet: worksheet.spreadsheet.to_string(),
                    title: worksheet.title.clone(),
                })?;
            tab.grid.set(cell, value);
        }
        self.writes
            .write()
            .map_err(|_| SheetsError::LockPoisoned)?
            .push(CellWrite {
                spreadsheet: worksheet.spreadsheet.clone(),
                worksheet: worksheet.title.clone(),
                cell,
                value: value.to_string(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SpreadsheetKey {
        SpreadsheetKey::new("book-1")
    }

    fn backend() -> InMemorySheets {
        let sheets = InMemorySheets::new();
        sheets
            .insert_worksheet(
                &key(),
                "Timestamps",
                Grid::from_rows(vec![vec!["Hash", "AppHash"]]),
            )
            .unwrap();
        sheets
    }

    #[tokio::test]
    async fn test_missing_worksheet_is_reported() {
        let sheets = backend();
        let err = sheets.worksheet(&key(), "Runtime").await.unwrap_err();
        assert_eq!(
            err,
            SheetsError::WorksheetNotFound {
                spreadsheet: "book-1".to_string(),
                title: "Runtime".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_spreadsheet_is_reported() {
        let sheets = backend();
        let other = SpreadsheetKey::new("book-2");
        assert!(sheets.worksheet(&other, "Timestamps").await.is_err());
    }

    #[tokio::test]
    async fn test_update_cell_grows_and_logs() {
        let sheets = backend();
        let ws = sheets.worksheet(&key(), "Timestamps").await.unwrap();
        sheets
            .update_cell(&ws, CellRef::new(4, 3).unwrap(), "x")
            .await
            .unwrap();

        let grid = sheets.get_all_values(&ws).await.unwrap();
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.cell(4, 3), "x");

        let writes = sheets.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].worksheet, "Timestamps");
        assert_eq!(writes[0].cell, CellRef { row: 4, col: 3 });
    }

    #[tokio::test]
    async fn test_row_zero_is_rejected_without_logging() {
        let sheets = backend();
        let ws = sheets.worksheet(&key(), "Timestamps").await.unwrap();
        let err = sheets
            .update_cell(&ws, CellRef { row: 0, col: 2 }, "x")
            .await
            .unwrap_err();
        assert_eq!(err, SheetsError::InvalidCell { row: 0, col: 2 });
        assert!(sheets.writes().is_empty());
    }

    #[tokio::test]
    async fn test_reads_are_trimmed() {
        let sheets = backend();
        let ws = sheets.worksheet(&key(), "Timestamps").await.unwrap();
        sheets
            .update_cell(&ws, CellRef::new(5, 5).unwrap(), "")
            .await
            .unwrap();
        let grid = sheets.get_all_values(&ws).await.unwrap();
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_insert_replaces_existing_title() {
        let sheets = backend();
        sheets
            .insert_worksheet(&key(), "Timestamps", Grid::from_rows(vec![vec!["new"]]))
            .unwrap();
        let grid = sheets.grid(&key(), "Timestamps").unwrap();
        assert_eq!(grid.cell(1, 1), "new");
    }
    #[tokio::test]
    async fn test_poisoned_lock_is_not_a_missing_worksheet() {
        let sheets = backend();
        let ws = sheets.worksheet(&key(), "Timestamps").await.unwrap();

        let books = Arc::clone(&sheets.books);
        let _ = std::thread::spawn(move || {
            let _guard = books.write().unwrap();
            panic!("poison the workbook lock");
        })
        .join();

        assert_eq!(sheets.get_all_values(&ws).await, Err(SheetsError::LockPoisoned));
        assert_eq!(
            sheets.update_cell(&ws, CellRef::new(1, 1).unwrap(), "x").await,
            Err(SheetsError::LockPoisoned)
        );
        assert!(sheets.grid(&key(), "Timestamps").is_none());
    }
}
