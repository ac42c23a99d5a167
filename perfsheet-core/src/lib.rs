//! perfsheet core - data types
//!
//! Pure data structures shared by the backend and report crates. Nothing in
//! here talks to the network.

pub mod cell;
pub mod environment;
pub mod error;
pub mod grid;
pub mod layout;
pub mod run;

pub use cell::{column_letters, CellRef};
pub use environment::{Environment, SpreadsheetKey};
pub use error::{
    PerfsheetError, PerfsheetResult, ReportError, SheetsError, SheetsResult,
};
pub use grid::Grid;
pub use layout::{PropertyAppendMode, RuntimeColumns};
pub use run::{FixedClock, ReportClock, RunContext, RunRecord, SystemClock};
