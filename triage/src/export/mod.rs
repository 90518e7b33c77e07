//! Export engine.
//!
//! Archive results and dashboard summaries are first flattened into
//! [`table::Table`]s (and, for JSON, [`table::ExportRecord`]s), then rendered
//! by one of three independent writers. All three formats therefore carry the
//! same rows and values for the same input.

pub mod csv;
pub mod html;
pub mod json;
pub mod table;

use crate::analytics::DashboardAnalytics;
use crate::error::{Result, TriageError};
use crate::types::Request;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use table::{RenderOptions, Table, export_records};

/// Output format of an export
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with a byte-order mark
    Csv,
    /// Pretty-printed JSON
    Json,
    /// Styled HTML table, saved with an `.xls` extension for spreadsheet tools
    Html,
}

impl ExportFormat {
    /// File extension, without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Html => "xls",
        }
    }

    /// MIME type of the rendered bytes
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8",
            Self::Json => "application/json",
            Self::Html => "application/vnd.ms-excel;charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Html => "html",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "html" | "xls" | "excel" => Ok(Self::Html),
            other => Err(TriageError::ExportFailure(format!("unsupported export format {other:?}"))),
        }
    }
}

/// A rendered export, ready to hand to a download
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Suggested file name
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// Rendered content
    pub bytes: Vec<u8>,
}

impl ExportDocument {
    fn new(prefix: &str, format: ExportFormat, options: &RenderOptions, exported_at: DateTime<Utc>, bytes: Vec<u8>) -> Self {
        let day = exported_at.with_timezone(&options.timezone).format("%Y-%m-%d");
        Self {
            file_name: format!("{prefix}-{day}.{}", format.extension()),
            content_type: format.content_type().to_string(),
            bytes,
        }
    }

    /// Content as text
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Export an archive result set.
///
/// # Errors
///
/// [`TriageError::ExportFailure`] if rendering fails.
pub fn export_archive(
    records: &[Request],
    format: ExportFormat,
    options: &RenderOptions,
    exported_at: DateTime<Utc>,
) -> Result<ExportDocument> {
    let flattened = export_records(records, options)?;

    let bytes = match format {
        ExportFormat::Csv => csv::render(&[Table::archive(&flattened)])?,
        ExportFormat::Json => json::render_archive(&flattened, exported_at)?,
        ExportFormat::Html => html::render(
            "Request archive",
            &format!("Exported {} · {} records", options.render(exported_at)?, flattened.len()),
            &[Table::archive(&flattened)],
        )?,
    };

    tracing::info!(%format, records = flattened.len(), bytes = bytes.len(), "Archive exported");
    Ok(ExportDocument::new("archive", format, options, exported_at, bytes))
}

/// Export dashboard analytics.
///
/// # Errors
///
/// [`TriageError::ExportFailure`] if rendering fails.
pub fn export_summary(
    analytics: &DashboardAnalytics,
    format: ExportFormat,
    options: &RenderOptions,
    exported_at: DateTime<Utc>,
) -> Result<ExportDocument> {
    let bytes = match format {
        ExportFormat::Csv => csv::render(&summary_tables(analytics))?,
        ExportFormat::Json => json::render_summary(analytics, exported_at)?,
        ExportFormat::Html => html::render(
            "Request statistics",
            &format!("Exported {}", options.render(exported_at)?),
            &summary_tables(analytics),
        )?,
    };

    tracing::info!(%format, bytes = bytes.len(), "Dashboard summary exported");
    Ok(ExportDocument::new("dashboard", format, options, exported_at, bytes))
}

/// Dashboard sections as tables, in display order
#[must_use]
pub fn summary_tables(analytics: &DashboardAnalytics) -> Vec<Table> {
    let summary = analytics.summary;
    let mut totals = Table::new(["Metric", "Value"]).titled("Summary");
    for (name, value) in [
        ("Total", summary.total),
        ("Pending", summary.pending),
        ("Approved", summary.approved),
        ("Edited", summary.edited),
    ] {
        totals.push_row([name.to_string(), value.to_string()]);
    }

    let mut by_category = Table::new(["Category", "Value"]).titled("Requests by category");
    for item in &analytics.by_category {
        by_category.push_row([item.name.clone(), item.value.to_string()]);
    }

    let mut by_status = Table::new(["Status", "Value"]).titled("Requests by status");
    for item in &analytics.by_status {
        by_status.push_row([item.name.clone(), item.value.to_string()]);
    }

    let mut daily = Table::new(["Date", "Requests"]).titled("Requests per day");
    for point in &analytics.time_series {
        daily.push_row([point.date.clone(), point.requests.to_string()]);
    }

    let mut details = Table::new(["Category", "Total", "Pending", "Processed", "Processing rate, %"])
        .titled("Details by category");
    for detail in &analytics.details_by_category {
        details.push_row([
            detail.category.clone(),
            detail.total.to_string(),
            detail.pending.to_string(),
            detail.processed.to_string(),
            format!("{:.1}", detail.processing_rate),
        ]);
    }

    vec![totals, by_category, by_status, daily, details]
}
