//! 1-based cell coordinates and A1 rendering.

use crate::error::{SheetsError, SheetsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A worksheet cell addressed by 1-based `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    /// Build a cell reference, rejecting row 0 and column 0.
    pub fn new(row: u32, col: u32) -> SheetsResult<Self> {
        if row == 0 || col == 0 {
            return Err(SheetsError::InvalidCell { row, col });
        }
        Ok(Self { row, col })
    }

    /// Render as A1 notation, e.g. `(5, 28)` -> `AB5`.
    pub fn to_a1(&self) -> String {
        format!("{}{}", column_letters(self.col), self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Bijective base-26 column label: 1 -> A, 26 -> Z, 27 -> AA.
///
/// Column 0 has no label and renders as the empty string.
pub fn column_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}
