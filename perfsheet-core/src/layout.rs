//! Fixed layout of a regression performance spreadsheet.
//!
//! Row 1 of "Timestamps" and "Properties" holds application names. Row 2 is a
//! secondary header and is never scanned. Run rows start at row 3, keyed by
//! the `(hash, app_hash)` pair in columns 1 and 2. "Runtime" stores a
//! `(cycles, pass)` column pair per application, and "Properties" keeps its
//! property labels in column 5. "STATUS" row 22 carries the last run.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};

pub const TIMESTAMPS: &str = "Timestamps";
pub const RUNTIME: &str = "Runtime";
pub const PROPERTIES: &str = "Properties";
pub const STATUS: &str = "STATUS";

pub const HEADER_ROW: u32 = 1;
pub const FIRST_DATA_ROW: u32 = 3;
pub const PROPERTY_LABEL_COL: u32 = 5;

pub const STATUS_ROW: u32 = 22;
pub const STATUS_TIMESTAMP_COL: u32 = 3;
pub const STATUS_HOST_COL: u32 = 4;

/// `strftime` pattern for run timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The "Runtime" columns paired with an application column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeColumns {
    pub cycles: u32,
    pub pass: u32,
}

impl RuntimeColumns {
    /// `cycles = 2*col - 7`, `pass = 2*col - 6`.
    ///
    /// Columns 1 to 3 have no valid pair.
    pub fn for_column(col: u32) -> Result<Self, ReportError> {
        let doubled = i64::from(col) * 2;
        if doubled - 7 < 1 {
            return Err(ReportError::InvalidRuntimeColumn { col });
        }
        Ok(Self {
            cycles: (doubled - 7) as u32,
            pass: (doubled - 6) as u32,
        })
    }
}

/// Where a newly appended property's value cell goes.
///
/// The label always lands on `len + 1`. `Legacy` writes the value on `len`,
/// one row above its label; `Aligned` writes it beside the label.
///
/// `Legacy` only keeps that one-row offset. `len` is taken from a snapshot
/// refreshed after every append, so several new properties in one run get
/// distinct label rows in both modes instead of overwriting each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyAppendMode {
    Legacy,
    Aligned,
}

impl PropertyAppendMode {
    /// `(label_row, value_row)` for a property appended to a sheet of `len` rows.
    pub fn rows(&self, len: u32) -> (u32, u32) {
        match self {
            PropertyAppendMode::Legacy => (len + 1, len.max(1)),
            PropertyAppendMode::Aligned => (len + 1, len + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_columns_offsets() {
        assert_eq!(
            RuntimeColumns::for_column(4),
            Ok(RuntimeColumns { cycles: 1, pass: 2 })
        );
        assert_eq!(
            RuntimeColumns::for_column(10),
            Ok(RuntimeColumns { cycles: 13, pass: 14 })
        );
    }

    #[test]
    fn test_runtime_columns_reject_low_columns() {
        for col in 0..4 {
            assert_eq!(
                RuntimeColumns::for_column(col),
                Err(ReportError::InvalidRuntimeColumn { col })
            );
        }
    }

    #[test]
    fn test_append_mode_rows() {
        assert_eq!(PropertyAppendMode::Legacy.rows(7), (8, 7));
        assert_eq!(PropertyAppendMode::Aligned.rows(7), (8, 8));
    }

    #[test]
    fn test_legacy_never_targets_row_zero() {
        assert_eq!(PropertyAppendMode::Legacy.rows(0), (1, 1));
    }
}
