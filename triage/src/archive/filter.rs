//! Archive filter predicate.

use crate::types::Request;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Sentinel that selects every value of a categorical field
pub const MATCH_ALL: &str = "ALL";

/// Categorical field selector
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum FieldMatch {
    /// Every record, including records without the field
    #[default]
    All,
    /// Records whose field equals this value exactly
    Exact(String),
}

impl FieldMatch {
    /// Parse a selector as a filter form submits it: `"ALL"` or blank match everything
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() || raw == MATCH_ALL {
            Self::All
        } else {
            Self::Exact(raw.to_string())
        }
    }

    /// Whether a record's field value passes this selector
    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => value == Some(expected.as_str()),
        }
    }
}

impl From<&str> for FieldMatch {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Filter over closed requests; all fields combine with AND.
///
/// Date bounds are calendar days in the evaluation timezone and cover
/// `[date_from 00:00:00, date_to 23:59:59]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveFilter {
    /// Case-insensitive substring searched across the text fields
    pub text_query: String,
    /// Category selector
    pub category: FieldMatch,
    /// Project selector
    pub project: FieldMatch,
    /// First day included
    pub date_from: Option<NaiveDate>,
    /// Last day included
    pub date_to: Option<NaiveDate>,
}

impl ArchiveFilter {
    /// A filter that keeps everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query
    #[must_use]
    pub fn with_text(mut self, query: impl Into<String>) -> Self {
        self.text_query = query.into();
        self
    }

    /// Set the category selector
    #[must_use]
    pub fn with_category(mut self, category: impl Into<FieldMatch>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the project selector
    #[must_use]
    pub fn with_project(mut self, project: impl Into<FieldMatch>) -> Self {
        self.project = project.into();
        self
    }

    /// Set the inclusive date range; either end may be open
    #[must_use]
    pub const fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Whether the filter keeps every record
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.normalized_query().is_empty()
            && self.category == FieldMatch::All
            && self.project == FieldMatch::All
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Evaluate the filter against one record
    #[must_use]
    pub fn matches(&self, request: &Request, timezone: FixedOffset) -> bool {
        self.category.matches(request.category.as_deref())
            && self.project.matches(request.project.as_deref())
            && self.matches_dates(request, timezone)
            && self.matches_text(request)
    }

    /// Keep the matching records, preserving their order
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [Request], timezone: FixedOffset) -> Vec<&'a Request> {
        let matched: Vec<&Request> = records
            .iter()
            .filter(|request| self.matches(request, timezone))
            .collect();
        tracing::debug!(input = records.len(), matched = matched.len(), "Archive filter applied");
        matched
    }

    fn normalized_query(&self) -> String {
        self.text_query.trim().to_lowercase()
    }

    fn matches_dates(&self, request: &Request, timezone: FixedOffset) -> bool {
        let created = request.created_at.with_timezone(&timezone).naive_local();

        let after_start = self
            .date_from
            .is_none_or(|from| created >= from.and_time(chrono::NaiveTime::MIN));
        let before_end = self
            .date_to
            .is_none_or(|to| end_of_day(to).is_some_and(|end| created <= end));

        after_start && before_end
    }

    fn matches_text(&self, request: &Request) -> bool {
        let query = self.normalized_query();
        query.is_empty() || search_text(request).contains(&query)
    }
}

/// Lower-cased haystack for the free-text query.
///
/// Present fields joined by a single space; missing fields are skipped.
#[must_use]
pub fn search_text(request: &Request) -> String {
    [
        request.email.as_deref(),
        request.full_name.as_deref(),
        request.organization.as_deref(),
        request.serial_number.as_deref(),
        request.device_type.as_deref(),
        request.project.as_deref(),
        request.operator_answer.as_deref(),
        Some(request.ai_draft_answer.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|field| !field.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

fn end_of_day(day: NaiveDate) -> Option<NaiveDateTime> {
    day.and_hms_opt(23, 59, 59)
}
