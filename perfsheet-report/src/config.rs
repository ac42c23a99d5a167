//! Configuration loading for the report command.
//!
//! All fields are required. No defaults.

use perfsheet_core::{Environment, PropertyAppendMode, SpreadsheetKey};
use perfsheet_sheets::ServiceAccountKey;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const CONFIG_ENV_VAR: &str = "PERFSHEET_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub credentials_path: PathBuf,
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub property_append: PropertyAppendMode,
    pub spreadsheets: SpreadsheetKeys,
    pub logging: LoggingConfig,
}

/// One spreadsheet per regression environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpreadsheetKeys {
    pub fpga: SpreadsheetKey,
    pub develop: SpreadsheetKey,
    pub retime: SpreadsheetKey,
    #[serde(rename = "syncMem")]
    pub sync_mem: SpreadsheetKey,
    #[serde(rename = "pre-master")]
    pub pre_master: SpreadsheetKey,
    pub master: SpreadsheetKey,
}

impl SpreadsheetKeys {
    pub fn key_for(&self, environment: Environment) -> &SpreadsheetKey {
        match environment {
            Environment::Fpga => &self.fpga,
            Environment::Develop => &self.develop,
            Environment::Retime => &self.retime,
            Environment::SyncMem => &self.sync_mem,
            Environment::PreMaster => &self.pre_master,
            Environment::Master => &self.master,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or PERFSHEET_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Invalid credentials file {}: {reason}", path.display())]
    Credentials { path: PathBuf, reason: String },
}

impl ReportConfig {
    /// Load and validate the file at `path`.
    ///
    /// `None` means neither `--config` nor `PERFSHEET_CONFIG` was given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "credentials_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must be an http(s) URL".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        for environment in Environment::ALL {
            if self.spreadsheets.key_for(environment).is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "spreadsheets",
                    reason: format!("key for '{}' must not be empty", environment),
                });
            }
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter",
                reason: "must not be empty".to_string(),
            });
        }
        if let Err(e) = EnvFilter::try_new(&self.logging.filter) {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter",
                reason: e.to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Read and parse the service-account key file.
    pub fn read_credentials(&self) -> Result<ServiceAccountKey, ConfigError> {
        let contents =
            std::fs::read_to_string(&self.credentials_path).map_err(|e| ConfigError::Credentials {
                path: self.credentials_path.clone(),
                reason: e.to_string(),
            })?;
        ServiceAccountKey::from_json(&contents).map_err(|e| ConfigError::Credentials {
            path: self.credentials_path.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
credentials_path = "/etc/perfsheet/service_account.json"
api_base_url = "https://sheets.googleapis.com/v4"
request_timeout_ms = 30000
property_append = "aligned"

[spreadsheets]
fpga = "fpga-key"
develop = "develop-key"
retime = "retime-key"
syncMem = "syncmem-key"
pre-master = "pre-master-key"
master = "master-key"

[logging]
filter = "perfsheet=info"
format = "text"
"#;

    #[test]
    fn test_parse_valid() {
        let config = ReportConfig::from_toml(VALID).unwrap();
        config.validate().unwrap();
        assert_eq!(config.property_append, PropertyAppendMode::Aligned);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_key_for_each_environment() {
        let config = ReportConfig::from_toml(VALID).unwrap();
        let keys = &config.spreadsheets;
        assert_eq!(keys.key_for(Environment::Fpga).as_str(), "fpga-key");
        assert_eq!(keys.key_for(Environment::Develop).as_str(), "develop-key");
        assert_eq!(keys.key_for(Environment::Retime).as_str(), "retime-key");
        assert_eq!(keys.key_for(Environment::SyncMem).as_str(), "syncmem-key");
        assert_eq!(keys.key_for(Environment::PreMaster).as_str(), "pre-master-key");
        assert_eq!(keys.key_for(Environment::Master).as_str(), "master-key");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = VALID.replace(
            "request_timeout_ms = 30000",
            "request_timeout_ms = 30000\nretries = 3",
        );
        assert!(matches!(ReportConfig::from_toml(&toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_property_append_is_required() {
        let toml = VALID.replace("property_append = \"aligned\"\n", "");
        assert!(matches!(ReportConfig::from_toml(&toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let toml = VALID.replace("30000", "0");
        let err = ReportConfig::from_toml(&toml).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "request_timeout_ms", .. }));
    }

    #[test]
    fn test_blank_spreadsheet_key_rejected() {
        let toml = VALID.replace("\"retime-key\"", "\"  \"");
        let err = ReportConfig::from_toml(&toml).unwrap().validate().unwrap_err();
        match err {
            ConfigError::InvalidValue { field, reason } => {
                assert_eq!(field, "spreadsheets");
                assert!(reason.contains("retime"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_filter_rejected() {
        let toml = VALID.replace("perfsheet=info", "perfsheet=notalevel");
        let err = ReportConfig::from_toml(&toml).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "logging.filter", .. }));
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let toml = VALID.replace("https://sheets.googleapis.com/v4", "sheets.googleapis.com");
        let err = ReportConfig::from_toml(&toml).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "api_base_url", .. }));
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(ReportConfig::load(None), Err(ConfigError::MissingConfigPath)));
    }
}
