//! Configuration types for chatscope.
//!
//! `DashboardConfig` represents the top-level `config.toml` that controls
//! status classification, the default reporting window, the database file
//! and logging.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Top-level configuration for the dashboard.
///
/// Loaded from `~/.chatscope/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Conversations older than this many days (measured from their first
    /// message) are classified `complete` unless overridden.
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: i64,

    /// Reporting window used for titles and export file names.
    #[serde(default)]
    pub date_range: DateRange,

    /// SQLite database file name, relative to the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_stale_after_days() -> i64 {
    7
}

fn default_database_file() -> String {
    "chatscope.db".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            stale_after_days: default_stale_after_days(),
            date_range: DateRange::default(),
            database_file: default_database_file(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging settings consumed by `chatscope-observe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Bridge spans to OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
            otel: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Reporting window offered by the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DateRange {
    #[serde(rename = "last-7-days")]
    Last7Days,
    #[default]
    #[serde(rename = "last-30-days")]
    Last30Days,
    #[serde(rename = "last-90-days")]
    Last90Days,
    #[serde(rename = "last-year")]
    LastYear,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::Last7Days => write!(f, "last-7-days"),
            DateRange::Last30Days => write!(f, "last-30-days"),
            DateRange::Last90Days => write!(f, "last-90-days"),
            DateRange::LastYear => write!(f, "last-year"),
        }
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last-7-days" | "7d" => Ok(DateRange::Last7Days),
            "last-30-days" | "30d" => Ok(DateRange::Last30Days),
            "last-90-days" | "90d" => Ok(DateRange::Last90Days),
            "last-year" | "1y" => Ok(DateRange::LastYear),
            other => Err(format!("invalid date range: '{other}'")),
        }
    }
}
