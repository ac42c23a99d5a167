//! A single regression run as handed to the reporter.

use crate::layout::TIMESTAMP_FORMAT;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Positional arguments of one run, kept verbatim.
///
/// `environment` stays a raw string until the reporter resolves it, so an
/// unknown name can still be reported. `pass_flag` and `cycles` are written to
/// the sheet exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub environment: String,
    pub test_id: String,
    pub app_name: String,
    pub pass_flag: String,
    pub cycles: String,
    pub hash: String,
    pub app_hash: String,
    pub properties_csv: String,
}

impl RunRecord {
    /// Property names from the comma-separated list.
    ///
    /// No escaping and no trimming; empty entries are skipped. Order and
    /// duplicates are preserved.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties_csv
            .split(',')
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Clock abstraction so report timestamps are deterministic in tests.
pub trait ReportClock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Production clock using local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ReportClock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl ReportClock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Values captured once per run and written to several sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub timestamp: NaiveDateTime,
    pub hostname: String,
}

impl RunContext {
    pub fn new(clock: &dyn ReportClock, hostname: impl Into<String>) -> Self {
        Self {
            timestamp: clock.now(),
            hostname: hostname.into(),
        }
    }

    /// Timestamp as `YYYY-MM-DD HH:MM:SS`.
    pub fn stamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
