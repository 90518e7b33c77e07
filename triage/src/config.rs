//! Configuration for the triage engine.
//!
//! Loads configuration from environment variables with sensible defaults.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::env;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Date-time rendering used in exports when none is configured
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Dashboard window used when none is configured
pub const DEFAULT_ANALYTICS_DAYS: u32 = 30;

/// Longest dashboard window accepted
pub const MAX_ANALYTICS_DAYS: u32 = 365;

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpdeskConfig {
    /// Archive browsing configuration
    pub archive: ArchiveConfig,
    /// Export rendering configuration
    pub export: ExportConfig,
    /// Dashboard configuration
    pub analytics: AnalyticsConfig,
    /// Log filter directive (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Archive browsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Records per page
    pub page_size: usize,
    /// Offset of the evaluation timezone from UTC, in minutes
    pub utc_offset_minutes: i32,
}

/// Export rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// `chrono` format string for record timestamps
    pub date_format: String,
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Days covered by the time series
    pub days: u32,
}

impl Default for HelpdeskConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl HelpdeskConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse::<i64>().ok());

        Self {
            archive: ArchiveConfig {
                page_size: parsed("ARCHIVE_PAGE_SIZE")
                    .filter(|size| *size >= 1)
                    .and_then(|size| usize::try_from(size).ok())
                    .unwrap_or(DEFAULT_PAGE_SIZE),
                utc_offset_minutes: parsed("ARCHIVE_UTC_OFFSET_MINUTES")
                    .and_then(|minutes| i32::try_from(minutes).ok())
                    .unwrap_or(0),
            },
            export: ExportConfig {
                date_format: lookup("EXPORT_DATE_FORMAT")
                    .filter(|format| !format.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            },
            analytics: AnalyticsConfig {
                days: clamp_days(
                    parsed("ANALYTICS_DAYS")
                        .and_then(|days| u32::try_from(days.max(0)).ok())
                        .unwrap_or(DEFAULT_ANALYTICS_DAYS),
                ),
            },
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Evaluation timezone for date filters, export rendering and day buckets.
    ///
    /// An offset outside ±24h falls back to UTC.
    #[must_use]
    pub fn timezone(&self) -> FixedOffset {
        self.archive
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Clamp a dashboard window to `[1, MAX_ANALYTICS_DAYS]`
#[must_use]
pub fn clamp_days(days: u32) -> u32 {
    days.clamp(1, MAX_ANALYTICS_DAYS)
}
