//! perfsheet Test Utilities
//!
//! Centralized test infrastructure for the perfsheet workspace:
//! - Seeded workbook fixtures installed into the in-memory backend
//! - Proptest generators for run arguments
//! - Deterministic run context

// Re-export the in-memory backend from its source crate
pub use perfsheet_sheets::{CellWrite, InMemorySheets, SheetsBackend};

pub use perfsheet_core::{
    layout, CellRef, Environment, FixedClock, Grid, PropertyAppendMode, RunContext, RunRecord,
    SheetsResult, SpreadsheetKey,
};

use chrono::NaiveDate;
use proptest::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

/// Timestamps/Properties columns before the first application column.
pub const LEADING_HEADERS: [&str; 5] = ["Hash", "AppHash", "Date", "Test", "Property"];

/// Runtime columns before the first application pair.
pub const RUNTIME_LEADING_HEADERS: [&str; 4] = ["Hash", "AppHash", "Date", "Test"];

pub const FIXTURE_HOSTNAME: &str = "regress-host-01";

/// Spreadsheet key used by the default fixture.
pub fn fixture_key() -> SpreadsheetKey {
    SpreadsheetKey::new("fixture-develop-book")
}

/// Run context pinned to 2024-01-01 12:34:56 on [`FIXTURE_HOSTNAME`].
pub fn fixed_context() -> RunContext {
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 34, 56))
        .expect("valid fixture time");
    RunContext::new(&FixedClock(at), FIXTURE_HOSTNAME)
}

/// Description of a regression workbook with the four standard worksheets.
#[derive(Debug, Clone)]
pub struct WorkbookFixture {
    pub key: SpreadsheetKey,
    pub apps: Vec<String>,
    pub runs: Vec<(String, String)>,
    pub property_labels: Vec<String>,
}

impl WorkbookFixture {
    pub fn new(key: SpreadsheetKey) -> Self {
        Self {
            key,
            apps: Vec::new(),
            runs: Vec::new(),
            property_labels: Vec::new(),
        }
    }

    pub fn with_app(mut self, name: &str) -> Self {
        self.apps.push(name.to_string());
        self
    }

    pub fn with_run(mut self, hash: &str, app_hash: &str) -> Self {
        self.runs.push((hash.to_string(), app_hash.to_string()));
        self
    }

    pub fn with_property_label(mut self, label: &str) -> Self {
        self.property_labels.push(label.to_string());
        self
    }

    /// Column the next unknown application would be allocated.
    pub fn next_app_col(&self) -> u32 {
        (LEADING_HEADERS.len() + self.apps.len()) as u32 + 1
    }

    pub fn app_col(&self, name: &str) -> Option<u32> {
        self.apps
            .iter()
            .position(|a| a == name)
            .map(|i| (LEADING_HEADERS.len() + i) as u32 + 1)
    }

    pub fn run_row(&self, hash: &str, app_hash: &str) -> Option<u32> {
        self.runs
            .iter()
            .position(|(h, a)| h == hash && a == app_hash)
            .map(|i| layout::FIRST_DATA_ROW + i as u32)
    }

    pub fn property_row(&self, label: &str) -> Option<u32> {
        self.property_labels
            .iter()
            .position(|l| l == label)
            .map(|i| layout::FIRST_DATA_ROW + i as u32)
    }

    fn header_row(&self) -> Vec<String> {
        LEADING_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.apps.iter().cloned())
            .collect()
    }

    pub fn timestamps_grid(&self) -> Grid {
        let units = vec![String::new(), String::new(), "units".to_string()];
        let mut rows = vec![self.header_row(), units];
        for (hash, app_hash) in &self.runs {
            rows.push(vec![hash.clone(), app_hash.clone(), "2023-12-31".to_string()]);
        }
        Grid::new(rows)
    }

    pub fn runtime_grid(&self) -> Grid {
        let mut header: Vec<String> =
            RUNTIME_LEADING_HEADERS.iter().map(|h| h.to_string()).collect();
        for app in &self.apps {
            header.push(app.clone());
            header.push(String::new());
        }
        let mut rows = vec![header, vec![String::new(); 4]];
        for (hash, app_hash) in &self.runs {
            rows.push(vec![hash.clone(), app_hash.clone()]);
        }
        Grid::new(rows)
    }

    pub fn properties_grid(&self) -> Grid {
        let mut rows = vec![self.header_row(), Vec::new()];
        let body = self.runs.len().max(self.property_labels.len());
        for i in 0..body {
            let mut row = vec![String::new(); LEADING_HEADERS.len()];
            if let Some((hash, app_hash)) = self.runs.get(i) {
                row[0] = hash.clone();
                row[1] = app_hash.clone();
            }
            if let Some(label) = self.property_labels.get(i) {
                row[layout::PROPERTY_LABEL_COL as usize - 1] = label.clone();
            }
            rows.push(row);
        }
        Grid::new(rows)
    }

    pub fn status_grid(&self) -> Grid {
        let mut rows = vec![vec!["Status".to_string()]];
        rows.resize(layout::STATUS_ROW as usize - 1, Vec::new());
        rows.push(vec![
            String::new(),
            "Last run".to_string(),
            "never".to_string(),
            "nowhere".to_string(),
        ]);
        Grid::new(rows)
    }

    /// Install all four worksheets into `sheets`.
    pub fn install(&self, sheets: &InMemorySheets) -> SheetsResult<()> {
        sheets.insert_worksheet(&self.key, layout::TIMESTAMPS, self.timestamps_grid())?;
        sheets.insert_worksheet(&self.key, layout::RUNTIME, self.runtime_grid())?;
        sheets.insert_worksheet(&self.key, layout::PROPERTIES, self.properties_grid())?;
        sheets.insert_worksheet(&self.key, layout::STATUS, self.status_grid())?;
        Ok(())
    }
}

/// The standard fixture: two applications, two runs, two property labels.
pub fn standard_workbook() -> WorkbookFixture {
    WorkbookFixture::new(fixture_key())
        .with_app("DotProduct")
        .with_app("GEMM_Blocked")
        .with_run("a1b2c3", "d4e5f6")
        .with_run("0badf00d", "c0ffee")
        .with_property_label("lut")
        .with_property_label("bram")
}

/// A backend seeded with [`standard_workbook`].
pub fn seeded_backend() -> (InMemorySheets, WorkbookFixture) {
    let sheets = InMemorySheets::new();
    let fixture = standard_workbook();
    fixture
        .install(&sheets)
        .unwrap_or_else(|e| panic!("fixture install failed: {}", e));
    (sheets, fixture)
}

/// A run against the standard fixture's second run row.
pub fn standard_run(app_name: &str, properties_csv: &str) -> RunRecord {
    RunRecord {
        environment: "develop".to_string(),
        test_id: "42".to_string(),
        app_name: app_name.to_string(),
        pass_flag: "1".to_string(),
        cycles: "81920".to_string(),
        hash: "0badf00d".to_string(),
        app_hash: "c0ffee".to_string(),
        properties_csv: properties_csv.to_string(),
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub fn arb_environment() -> impl Strategy<Value = Environment> {
    proptest::sample::select(Environment::ALL.to_vec())
}

/// Strings that never name a known environment.
pub fn arb_unknown_environment() -> impl Strategy<Value = String> {
    "[a-zA-Z_-]{0,12}".prop_filter("must not be a known environment", |s| {
        s.parse::<Environment>().is_err()
    })
}

pub fn arb_app_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9_]{2,15}"
}

pub fn arb_hash() -> impl Strategy<Value = String> {
    "[0-9a-f]{6,12}"
}

/// Comma-separated lists of simple property names.
pub fn arb_property_csv() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{2,8}", 0..5).prop_map(|names| names.join(","))
}
