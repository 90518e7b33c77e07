//! Dashboard analytics over the whole request set.

use crate::config::clamp_days;
use crate::types::{Request, Resolution, category};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Dashboard figures
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    /// Headline counters
    pub summary: Summary,
    /// Requests per category
    pub by_category: Vec<NameValue>,
    /// Pending / approved / edited counts
    pub by_status: Vec<NameValue>,
    /// Requests created per day, oldest first
    pub time_series: Vec<DailyPoint>,
    /// Per-category processing figures
    pub details_by_category: Vec<CategoryDetail>,
}

/// Headline counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// All requests
    pub total: u64,
    /// Requests still waiting for an operator
    pub pending: u64,
    /// Closed with the AI draft
    pub approved: u64,
    /// Closed with an operator-written answer
    pub edited: u64,
}

/// A labelled count
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    /// Label
    pub name: String,
    /// Count
    pub value: u64,
}

impl NameValue {
    fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Requests created on one day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Day as `dd.MM`
    pub date: String,
    /// Requests created that day
    pub requests: u64,
}

/// Processing figures for one category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    /// Category label
    pub category: String,
    /// Requests in the category
    pub total: u64,
    /// Of those, still waiting for an operator
    pub pending: u64,
    /// `total - pending`
    pub processed: u64,
    /// Share processed, in percent with one decimal
    pub processing_rate: f64,
}

#[derive(Default)]
struct Counters {
    total: u64,
    pending: u64,
}

/// Compute dashboard analytics.
///
/// The time series covers the `days` days (clamped to `[1, 365]`) ending on
/// the day of `now` in `timezone`.
#[must_use]
pub fn compute(
    requests: &[Request],
    days: u32,
    now: DateTime<Utc>,
    timezone: FixedOffset,
) -> DashboardAnalytics {
    let mut summary = Summary::default();
    // Keyed by (canonical position, name): known categories first, then the rest alphabetically
    let mut by_key: BTreeMap<(usize, String), Counters> = BTreeMap::new();

    for request in requests {
        let awaiting = request.status.is_awaiting_operator();

        summary.total += 1;
        if awaiting {
            summary.pending += 1;
        } else if request.is_archived() {
            match request.resolution {
                Some(Resolution::Approved) => summary.approved += 1,
                Some(Resolution::Edited) => summary.edited += 1,
                None => {},
            }
        }

        let counters = by_key.entry(category_key(request)).or_default();
        counters.total += 1;
        if awaiting {
            counters.pending += 1;
        }
    }

    let by_category = by_key
        .iter()
        .map(|((_, name), counters)| NameValue::new(category::label(name), counters.total))
        .collect();

    let details_by_category = by_key
        .iter()
        .map(|((_, name), counters)| {
            let processed = counters.total - counters.pending;
            CategoryDetail {
                category: category::label(name),
                total: counters.total,
                pending: counters.pending,
                processed,
                processing_rate: processing_rate(processed, counters.total),
            }
        })
        .collect();

    let by_status = vec![
        NameValue::new("Pending", summary.pending),
        NameValue::new("Approved", summary.approved),
        NameValue::new("Edited", summary.edited),
    ];

    let analytics = DashboardAnalytics {
        summary,
        by_category,
        by_status,
        time_series: time_series(requests, days, now, timezone),
        details_by_category,
    };
    tracing::debug!(
        total = analytics.summary.total,
        pending = analytics.summary.pending,
        days = analytics.time_series.len(),
        "Dashboard analytics computed"
    );
    analytics
}

fn category_key(request: &Request) -> (usize, String) {
    let name = request
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(category::OTHER);
    (
        category::position(name).unwrap_or(category::KNOWN.len()),
        name.to_string(),
    )
}

/// `round(processed / total * 1000) / 10`, zero for an empty category
#[allow(clippy::cast_precision_loss)] // counts stay far below 2^52
fn processing_rate(processed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (processed as f64 / total as f64 * 1000.0).round() / 10.0
}

fn time_series(
    requests: &[Request],
    days: u32,
    now: DateTime<Utc>,
    timezone: FixedOffset,
) -> Vec<DailyPoint> {
    let days = clamp_days(days);
    let end = now.with_timezone(&timezone).date_naive();
    let start = end - Duration::days(i64::from(days) - 1);

    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();
    for request in requests {
        let day = request.created_at.with_timezone(&timezone).date_naive();
        if (start..=end).contains(&day) {
            *per_day.entry(day).or_default() += 1;
        }
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| DailyPoint {
            date: day.format("%d.%m").to_string(),
            requests: per_day.get(&day).copied().unwrap_or(0),
        })
        .collect()
}
