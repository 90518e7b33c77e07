//! JSON rendering.

use super::table::ExportRecord;
use crate::analytics::DashboardAnalytics;
use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveDocument<'a> {
    export_date: String,
    total: usize,
    records: &'a [ExportRecord],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDocument<'a> {
    #[serde(flatten)]
    analytics: &'a DashboardAnalytics,
    export_date: String,
}

/// `{ exportDate, total, records }`, pretty-printed
///
/// # Errors
///
/// [`crate::error::TriageError::ExportFailure`] if serialization fails.
pub fn render_archive(records: &[ExportRecord], exported_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let document = ArchiveDocument {
        export_date: export_date(exported_at),
        total: records.len(),
        records,
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

/// The analytics structure plus `exportDate`, pretty-printed
///
/// # Errors
///
/// [`crate::error::TriageError::ExportFailure`] if serialization fails.
pub fn render_summary(analytics: &DashboardAnalytics, exported_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let document = SummaryDocument {
        analytics,
        export_date: export_date(exported_at),
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

fn export_date(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
