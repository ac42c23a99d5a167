//! perfsheet report - record regression runs in performance spreadsheets
//!
//! The `report` binary resolves the environment's spreadsheet, finds the
//! application column and the run row, and writes the run into the
//! "Timestamps", "Runtime", "Properties" and "STATUS" worksheets.

pub mod cli;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod writer;

pub use config::{ConfigError, LogFormat, LoggingConfig, ReportConfig, SpreadsheetKeys};
pub use error::CliError;
pub use writer::{ColumnPlan, ReportSummary, ReportWriter};

use perfsheet_core::{Environment, RunContext, RunRecord};
use std::io::Write;

/// Result of a report invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Written(ReportSummary),
    /// The environment named no spreadsheet; nothing was read or written.
    NoSpreadsheet { message: String },
}

/// Run the whole report, printing the user-facing lines to `out`.
///
/// An unknown environment prints `No spreadsheet for <pass_flag>` and returns
/// without touching the backend. Otherwise `Col is <n>` is printed as soon as
/// the column is resolved, before any write.
pub async fn run_report(
    writer: &ReportWriter<'_>,
    keys: &SpreadsheetKeys,
    run: &RunRecord,
    context: &RunContext,
    out: &mut dyn Write,
) -> Result<ReportOutcome, CliError> {
    let environment = match run.environment.parse::<Environment>() {
        Ok(environment) => environment,
        Err(err) => {
            tracing::warn!(error = %err, "No spreadsheet for environment");
            let message = format!("No spreadsheet for {}", run.pass_flag);
            writeln!(out, "{}", message)?;
            return Ok(ReportOutcome::NoSpreadsheet { message });
        }
    };
    let spreadsheet = keys.key_for(environment);
    tracing::info!(%environment, %spreadsheet, test_id = %run.test_id, "Reporting run");

    let plan = writer.resolve_column(spreadsheet, &run.app_name).await?;
    writeln!(out, "Col is {}", plan.column)?;

    let summary = writer.write_run(spreadsheet, plan, run, context).await?;
    Ok(ReportOutcome::Written(summary))
}
