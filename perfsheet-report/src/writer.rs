//! Writes one regression run into a performance spreadsheet.
//!
//! A run touches four worksheets in a fixed order: headers (for a new
//! application column), the "Timestamps" stamp, the "Runtime" pair, the
//! "Properties" block and the "STATUS" line. Every write is an independent
//! remote call; a failure partway through leaves earlier writes in place.
//!
//! All lookups that can fail without writing (column guard, row match,
//! worksheet resolution) happen before the first write.

use perfsheet_core::layout::{
    self, PropertyAppendMode, RuntimeColumns, FIRST_DATA_ROW, HEADER_ROW, PROPERTY_LABEL_COL,
    STATUS_HOST_COL, STATUS_ROW, STATUS_TIMESTAMP_COL,
};
use perfsheet_core::{
    CellRef, Grid, PerfsheetResult, ReportError, RunContext, RunRecord, SpreadsheetKey,
};
use perfsheet_sheets::{SheetsBackend, Worksheet};
use serde::Serialize;
use tracing::{debug, info, warn};

/// The application column resolved from the "Timestamps" sheet.
///
/// Holds the snapshot it was resolved from so the row lookup reads the same
/// data.
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    pub timestamps: Worksheet,
    pub snapshot: Grid,
    pub column: u32,
    pub created: bool,
}

/// What a run changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub spreadsheet: SpreadsheetKey,
    pub column: u32,
    pub column_created: bool,
    pub row: u32,
    pub cycles_column: u32,
    pub pass_column: u32,
    pub properties_updated: Vec<String>,
    pub properties_appended: Vec<String>,
}

#[derive(Debug, Default)]
struct PropertyChanges {
    updated: Vec<String>,
    appended: Vec<String>,
}

/// Executes the report steps against any [`SheetsBackend`].
pub struct ReportWriter<'a> {
    backend: &'a dyn SheetsBackend,
    append_mode: PropertyAppendMode,
}

impl<'a> ReportWriter<'a> {
    pub fn new(backend: &'a dyn SheetsBackend, append_mode: PropertyAppendMode) -> Self {
        Self {
            backend,
            append_mode,
        }
    }

    /// Full run: resolve the column, then write.
    pub async fn report(
        &self,
        spreadsheet: &SpreadsheetKey,
        run: &RunRecord,
        context: &RunContext,
    ) -> PerfsheetResult<ReportSummary> {
        let plan = self.resolve_column(spreadsheet, &run.app_name).await?;
        self.write_run(spreadsheet, plan, run, context).await
    }

    /// Read "Timestamps" and find the application's column.
    ///
    /// An existing header is reused (first occurrence). Otherwise the column is
    /// one past the populated header width.
    pub async fn resolve_column(
        &self,
        spreadsheet: &SpreadsheetKey,
        app_name: &str,
    ) -> PerfsheetResult<ColumnPlan> {
        let timestamps = self.backend.worksheet(spreadsheet, layout::TIMESTAMPS).await?;
        let snapshot = self.backend.get_all_values(&timestamps).await?;

        let (column, created) = match snapshot.find_in_header(app_name) {
            Some(col) => (col, false),
            None => (snapshot.header_width() + 1, true),
        };
        info!(app = app_name, column, created, "Resolved application column");

        Ok(ColumnPlan {
            timestamps,
            snapshot,
            column,
            created,
        })
    }

    /// Steps after column resolution.
    ///
    /// # Errors
    /// `InvalidRuntimeColumn` and `RowNotFound` are raised before any write, as
    /// is a missing "Runtime", "Properties" or "STATUS" worksheet.
    pub async fn write_run(
        &self,
        spreadsheet: &SpreadsheetKey,
        plan: ColumnPlan,
        run: &RunRecord,
        context: &RunContext,
    ) -> PerfsheetResult<ReportSummary> {
        let col = plan.column;
        let runtime_cols = RuntimeColumns::for_column(col)?;
        let row = plan
            .snapshot
            .find_row_by_pair(FIRST_DATA_ROW, &run.hash, &run.app_hash)
            .ok_or_else(|| ReportError::RowNotFound {
                hash: run.hash.clone(),
                app_hash: run.app_hash.clone(),
            })?;
        info!(row, hash = %run.hash, app_hash = %run.app_hash, "Resolved run row");

        let runtime = self.backend.worksheet(spreadsheet, layout::RUNTIME).await?;
        let properties = self.backend.worksheet(spreadsheet, layout::PROPERTIES).await?;
        let status = self.backend.worksheet(spreadsheet, layout::STATUS).await?;

        if plan.created {
            self.write(&plan.timestamps, HEADER_ROW, col, &run.app_name).await?;
            self.write(&properties, HEADER_ROW, col, &run.app_name).await?;
            self.write(&runtime, HEADER_ROW, runtime_cols.cycles, &run.app_name)
                .await?;
            info!(app = %run.app_name, column = col, "Allocated application column");
        }

        let stamp = context.stamp();
        self.write(&plan.timestamps, row, col, &stamp).await?;

        self.write(&runtime, row, runtime_cols.cycles, &run.cycles).await?;
        self.write(&runtime, row, runtime_cols.pass, &run.pass_flag).await?;

        let changes = self.write_properties(&properties, run, row, col).await?;

        self.write(&status, STATUS_ROW, STATUS_TIMESTAMP_COL, &stamp).await?;
        self.write(&status, STATUS_ROW, STATUS_HOST_COL, &context.hostname)
            .await?;

        Ok(ReportSummary {
            spreadsheet: spreadsheet.clone(),
            column: col,
            column_created: plan.created,
            row,
            cycles_column: runtime_cols.cycles,
            pass_column: runtime_cols.pass,
            properties_updated: changes.updated,
            properties_appended: changes.appended,
        })
    }

    async fn write_properties(
        &self,
        properties: &Worksheet,
        run: &RunRecord,
        row: u32,
        col: u32,
    ) -> PerfsheetResult<PropertyChanges> {
        self.write(properties, row, col, &run.pass_flag).await?;
        let mut snapshot = self.backend.get_all_values(properties).await?;
        let mut changes = PropertyChanges::default();

        for name in run.property_names() {
            let matches = snapshot.rows_matching(FIRST_DATA_ROW, PROPERTY_LABEL_COL, name);
            if !matches.is_empty() {
                // Every labelled row gets the property name, not just the first.
                for label_row in matches {
                    self.write(properties, label_row, col, name).await?;
                    snapshot.set(CellRef::new(label_row, col)?, name);
                    debug!(property = name, row = label_row, "Updated property");
                }
                changes.updated.push(name.to_string());
                continue;
            }

            let len = snapshot.row_count();
            let (label_row, value_row) = self.append_mode.rows(len);
            if self.append_mode == PropertyAppendMode::Legacy {
                warn!(
                    property = name,
                    label_row, value_row, "Legacy append writes the value above its label"
                );
            }
            self.write(properties, label_row, PROPERTY_LABEL_COL, name).await?;
            snapshot.set(CellRef::new(label_row, PROPERTY_LABEL_COL)?, name);
            self.write(properties, value_row, col, name).await?;
            snapshot.set(CellRef::new(value_row, col)?, name);
            info!(property = name, label_row, value_row, "Appended property");
            changes.appended.push(name.to_string());
        }

        Ok(changes)
    }

    async fn write(
        &self,
        worksheet: &Worksheet,
        row: u32,
        col: u32,
        value: &str,
    ) -> PerfsheetResult<()> {
        let cell = CellRef::new(row, col)?;
        self.backend.update_cell(worksheet, cell, value).await?;
        Ok(())
    }
}
