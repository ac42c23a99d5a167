//! Regression environments (branches) and the spreadsheets they report into.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regression channel selecting which spreadsheet receives a run.
///
/// Names match exactly and case-sensitively: `syncMem` is known, `syncmem`
/// is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "fpga")]
    Fpga,
    #[serde(rename = "develop")]
    Develop,
    #[serde(rename = "retime")]
    Retime,
    #[serde(rename = "syncMem")]
    SyncMem,
    #[serde(rename = "pre-master")]
    PreMaster,
    #[serde(rename = "master")]
    Master,
}

impl Environment {
    /// Every known environment, in lookup order.
    pub const ALL: [Environment; 6] = [
        Environment::Fpga,
        Environment::Develop,
        Environment::Retime,
        Environment::SyncMem,
        Environment::PreMaster,
        Environment::Master,
    ];

    /// The name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Fpga => "fpga",
            Environment::Develop => "develop",
            Environment::Retime => "retime",
            Environment::SyncMem => "syncMem",
            Environment::PreMaster => "pre-master",
            Environment::Master => "master",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .iter()
            .copied()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| ReportError::UnknownEnvironment {
                name: s.to_string(),
            })
    }
}

/// Opaque spreadsheet document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpreadsheetKey(String);

impl SpreadsheetKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SpreadsheetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
