//! Archive query: filter, then window.

use super::filter::ArchiveFilter;
use super::pagination::{PageToken, Paginator};
use crate::types::Request;
use chrono::FixedOffset;
use serde::Serialize;
use std::collections::BTreeSet;

/// One screen of archive results
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePage {
    /// Records on the current page, in archive order
    pub records: Vec<Request>,
    /// Page shown, after clamping
    pub current_page: usize,
    /// Pages of filtered results; zero when nothing matched
    pub total_pages: usize,
    /// Records per page
    pub page_size: usize,
    /// Size of the whole archive
    pub total: usize,
    /// Records passing the filter
    pub matched: usize,
    /// Compact page selector for `current_page`
    pub selector: Vec<PageToken>,
}

/// Keep only closed requests, preserving order
#[must_use]
pub fn archived(records: impl IntoIterator<Item = Request>) -> Vec<Request> {
    records.into_iter().filter(Request::is_archived).collect()
}

/// Filter `archive` and cut out `page`.
///
/// `archive` must already be in display order; the result keeps it.
#[must_use]
pub fn query(
    archive: &[Request],
    filter: &ArchiveFilter,
    page: usize,
    paginator: Paginator,
    timezone: FixedOffset,
) -> ArchivePage {
    let matched: Vec<Request> = filter.apply(archive, timezone).into_iter().cloned().collect();
    let window = paginator.paginate(&matched, page);

    ArchivePage {
        selector: window.selector(),
        records: window.items,
        current_page: window.current_page,
        total_pages: window.total_pages,
        page_size: window.page_size,
        total: archive.len(),
        matched: matched.len(),
    }
}

/// Distinct non-empty project names, sorted
#[must_use]
pub fn project_options<'a>(records: impl IntoIterator<Item = &'a Request>) -> Vec<String> {
    records
        .into_iter()
        .filter_map(|request| request.project.as_deref())
        .filter(|project| !project.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
