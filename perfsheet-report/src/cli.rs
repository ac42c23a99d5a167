//! Command-line arguments.

use crate::config::CONFIG_ENV_VAR;
use clap::Parser;
use perfsheet_core::RunRecord;
use std::path::PathBuf;

/// Record one regression run in its environment's performance spreadsheet.
#[derive(Debug, Parser)]
#[command(name = "report", version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Regression environment (fpga, develop, retime, syncMem, pre-master, master)
    pub env: String,

    /// Test identifier
    #[arg(allow_hyphen_values = true)]
    pub test_id: String,

    /// Application name, used as the column header
    #[arg(allow_hyphen_values = true)]
    pub app_name: String,

    /// Pass flag, written verbatim
    #[arg(allow_hyphen_values = true)]
    pub pass_flag: String,

    /// Cycle count, written verbatim
    #[arg(allow_hyphen_values = true)]
    pub cycles: String,

    /// Build hash
    #[arg(allow_hyphen_values = true)]
    pub hash: String,

    /// Application hash
    #[arg(allow_hyphen_values = true)]
    pub app_hash: String,

    /// Comma-separated property names
    #[arg(allow_hyphen_values = true)]
    pub properties_csv: String,
}

impl Cli {
    /// Split into the config path and the run arguments.
    pub fn into_parts(self) -> (Option<PathBuf>, RunRecord) {
        let record = RunRecord {
            environment: self.env,
            test_id: self.test_id,
            app_name: self.app_name,
            pass_flag: self.pass_flag,
            cycles: self.cycles,
            hash: self.hash,
            app_hash: self.app_hash,
            properties_csv: self.properties_csv,
        };
        (self.config, record)
    }
}

/// Hostname recorded on the STATUS sheet.
pub fn local_hostname() -> String {
    gethostname::gethostname().to_string_lossy().into_owned()
}
