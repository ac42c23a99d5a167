//! Worksheet value snapshots and the lookups the report runs over them.

use crate::cell::CellRef;
use serde::{Deserialize, Serialize};

/// All values of a worksheet, row-major, as the values API returns them.
///
/// Trailing empty cells in a row and trailing empty rows are dropped on
/// construction. Interior empty rows are kept. Reading outside the data
/// yields `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let mut rows = rows;
        for row in &mut rows {
            while row.last().is_some_and(|c| c.is_empty()) {
                row.pop();
            }
        }
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Self { rows }
    }

    /// Convenience constructor for literal tables.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at a 1-based position, `""` when outside the data.
    pub fn cell(&self, row: u32, col: u32) -> &str {
        if row == 0 || col == 0 {
            return "";
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Write into the snapshot, growing it as needed.
    pub fn set(&mut self, cell: CellRef, value: impl Into<String>) {
        let (r, c) = (cell.row as usize - 1, cell.col as usize - 1);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let row = &mut self.rows[r];
        if row.len() <= c {
            row.resize(c + 1, String::new());
        }
        row[c] = value.into();
    }

    /// Number of populated cells in row 1.
    pub fn header_width(&self) -> u32 {
        self.rows.first().map(|r| r.len() as u32).unwrap_or(0)
    }

    /// 1-based column of the first row-1 cell equal to `name`.
    pub fn find_in_header(&self, name: &str) -> Option<u32> {
        self.rows
            .first()?
            .iter()
            .position(|c| c == name)
            .map(|i| i as u32 + 1)
    }

    /// First row at or after `first_row` whose columns 1 and 2 equal `(a, b)`.
    pub fn find_row_by_pair(&self, first_row: u32, a: &str, b: &str) -> Option<u32> {
        (first_row.max(1)..=self.row_count())
            .find(|&row| self.cell(row, 1) == a && self.cell(row, 2) == b)
    }

    /// Every row at or after `first_row` whose value in `col` equals `value`.
    pub fn rows_matching(&self, first_row: u32, col: u32, value: &str) -> Vec<u32> {
        (first_row.max(1)..=self.row_count())
            .filter(|&row| self.cell(row, col) == value)
            .collect()
    }
}
