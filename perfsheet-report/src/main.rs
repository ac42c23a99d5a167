//! `report` entry point.

use clap::Parser;
use perfsheet_core::{RunContext, SystemClock};
use perfsheet_report::cli::{local_hostname, Cli};
use perfsheet_report::telemetry::init_logging;
use perfsheet_report::{run_report, CliError, ReportConfig, ReportOutcome, ReportWriter};
use perfsheet_sheets::{GoogleSheetsClient, SystemAuthClock};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Report failed");
            eprintln!("report: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let (config_path, record) = cli.into_parts();
    let config = ReportConfig::load(config_path.as_deref())?;
    init_logging(&config.logging)?;

    let key = config.read_credentials()?;
    let client = GoogleSheetsClient::from_service_account(
        &config.api_base_url,
        config.request_timeout(),
        key,
        Arc::new(SystemAuthClock),
    )?;
    let writer = ReportWriter::new(&client, config.property_append);
    let context = RunContext::new(&SystemClock, local_hostname());

    let mut stdout = std::io::stdout();
    match run_report(&writer, &config.spreadsheets, &record, &context, &mut stdout).await? {
        ReportOutcome::Written(summary) => {
            tracing::info!(
                column = summary.column,
                column_created = summary.column_created,
                row = summary.row,
                updated = ?summary.properties_updated,
                appended = ?summary.properties_appended,
                "Run recorded"
            );
        }
        ReportOutcome::NoSpreadsheet { .. } => {}
    }
    Ok(())
}
