//! The tabular representation every export format renders from.

use crate::error::{Result, TriageError};
use crate::types::Request;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::fmt::Write as _;

/// Archive export columns, in their fixed order
pub const ARCHIVE_COLUMNS: [&str; 22] = [
    "id",
    "channel",
    "email",
    "fullName",
    "organization",
    "phone",
    "category",
    "project",
    "deviceType",
    "serialNumber",
    "taxId",
    "countryRegion",
    "confidenceScorePercent",
    "userMessage",
    "aiDraftAnswer",
    "operatorAnswer",
    "operatorNotes",
    "status",
    "operatorName",
    "createdAt",
    "updatedAt",
    "respondedAt",
];

/// How timestamps are rendered into cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Timezone the timestamps are shown in
    pub timezone: FixedOffset,
    /// `chrono` format string
    pub date_format: String,
}

impl RenderOptions {
    /// Creates new `RenderOptions`
    #[must_use]
    pub fn new(timezone: FixedOffset, date_format: impl Into<String>) -> Self {
        Self {
            timezone,
            date_format: date_format.into(),
        }
    }

    /// Render `at` with the configured format.
    ///
    /// # Errors
    ///
    /// [`TriageError::ExportFailure`] if the format string is invalid.
    pub fn render(&self, at: DateTime<Utc>) -> Result<String> {
        let mut out = String::new();
        write!(out, "{}", at.with_timezone(&self.timezone).format(&self.date_format)).map_err(
            |_| TriageError::ExportFailure(format!("invalid date format {:?}", self.date_format)),
        )?;
        Ok(out)
    }
}

/// One archive record flattened for export.
///
/// Field order matches [`ARCHIVE_COLUMNS`]; missing values serialize as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub(crate) id: u64,
    pub(crate) channel: String,
    pub(crate) email: Option<String>,
    pub(crate) full_name: Option<String>,
    pub(crate) organization: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) project: Option<String>,
    pub(crate) device_type: Option<String>,
    pub(crate) serial_number: Option<String>,
    pub(crate) tax_id: Option<String>,
    pub(crate) country_region: Option<String>,
    pub(crate) confidence_score_percent: u32,
    pub(crate) user_message: String,
    pub(crate) ai_draft_answer: String,
    pub(crate) operator_answer: Option<String>,
    pub(crate) operator_notes: Option<String>,
    pub(crate) status: String,
    pub(crate) operator_name: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) responded_at: Option<String>,
}

impl ExportRecord {
    /// Flatten `request`, rendering its timestamps with `options`.
    ///
    /// # Errors
    ///
    /// [`TriageError::ExportFailure`] if a timestamp cannot be rendered.
    pub fn from_request(request: &Request, options: &RenderOptions) -> Result<Self> {
        Ok(Self {
            id: request.id.value(),
            channel: request.channel.as_str().to_string(),
            email: request.email.clone(),
            full_name: request.full_name.clone(),
            organization: request.organization.clone(),
            phone: request.phone.clone(),
            category: request.category.clone(),
            project: request.project.clone(),
            device_type: request.device_type.clone(),
            serial_number: request.serial_number.clone(),
            tax_id: request.tax_id.clone(),
            country_region: request.country_region.clone(),
            confidence_score_percent: request.confidence_percent(),
            user_message: request.user_message.clone(),
            ai_draft_answer: request.ai_draft_answer.clone(),
            operator_answer: request.operator_answer.clone(),
            operator_notes: request.operator_notes.clone(),
            status: request.status.as_str().to_string(),
            operator_name: request.assigned_operator.as_ref().map(|o| o.name.clone()),
            created_at: options.render(request.created_at)?,
            updated_at: options.render(request.updated_at)?,
            responded_at: request.responded_at.map(|at| options.render(at)).transpose()?,
        })
    }

    /// Cell values in column order; missing values are empty strings
    #[must_use]
    pub fn cells(&self) -> Vec<String> {
        fn text(value: Option<&String>) -> String {
            value.cloned().unwrap_or_default()
        }

        vec![
            self.id.to_string(),
            self.channel.clone(),
            text(self.email.as_ref()),
            text(self.full_name.as_ref()),
            text(self.organization.as_ref()),
            text(self.phone.as_ref()),
            text(self.category.as_ref()),
            text(self.project.as_ref()),
            text(self.device_type.as_ref()),
            text(self.serial_number.as_ref()),
            text(self.tax_id.as_ref()),
            text(self.country_region.as_ref()),
            self.confidence_score_percent.to_string(),
            self.user_message.clone(),
            self.ai_draft_answer.clone(),
            text(self.operator_answer.as_ref()),
            text(self.operator_notes.as_ref()),
            self.status.clone(),
            text(self.operator_name.as_ref()),
            self.created_at.clone(),
            self.updated_at.clone(),
            text(self.responded_at.as_ref()),
        ]
    }
}

/// Flatten every record of a result set
///
/// # Errors
///
/// [`TriageError::ExportFailure`] if a timestamp cannot be rendered.
pub fn export_records<'a>(
    records: impl IntoIterator<Item = &'a Request>,
    options: &RenderOptions,
) -> Result<Vec<ExportRecord>> {
    records
        .into_iter()
        .map(|request| ExportRecord::from_request(request, options))
        .collect()
}

/// A titled grid of text cells
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Section title, rendered above the header when present
    pub title: Option<String>,
    /// Header row
    pub columns: Vec<String>,
    /// Body rows, each as wide as `columns`
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Untitled table with the given header
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: None,
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Set the section title
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a row
    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// The archive grid for `records`
    #[must_use]
    pub fn archive(records: &[ExportRecord]) -> Self {
        let mut table = Self::new(ARCHIVE_COLUMNS);
        for record in records {
            table.push_row(record.cells());
        }
        table
    }
}
