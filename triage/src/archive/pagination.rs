//! Page windows and the compact page selector.

use crate::config::DEFAULT_PAGE_SIZE;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Windows an ordered sequence into fixed-size, 1-indexed pages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// Paginator with `page_size` records per page; zero means the default
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
        Self { page_size }
    }

    /// Records per page
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(len / page_size)`; zero for an empty sequence
    #[must_use]
    pub const fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Clamp `page` into `[1, max(total_pages, 1)]`
    #[must_use]
    pub fn clamp_page(&self, page: usize, len: usize) -> usize {
        page.clamp(1, self.total_pages(len).max(1))
    }

    /// Index range of `page` (clamped) within a sequence of `len`
    #[must_use]
    pub fn window(&self, page: usize, len: usize) -> Range<usize> {
        let page = self.clamp_page(page, len);
        let start = ((page - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    /// Cut `page` out of `items`
    #[must_use]
    pub fn paginate<T: Clone>(&self, items: &[T], page: usize) -> Page<T> {
        let current_page = self.clamp_page(page, items.len());
        Page {
            items: items[self.window(current_page, items.len())].to_vec(),
            current_page,
            total_pages: self.total_pages(items.len()),
            total_items: items.len(),
            page_size: self.page_size,
        }
    }
}

/// One page window of a sequence
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Page shown, after clamping
    pub current_page: usize,
    /// Number of pages; zero means "no results"
    pub total_pages: usize,
    /// Length of the windowed sequence
    pub total_items: usize,
    /// Records per page
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Whether the windowed sequence was empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Compact selector for this page
    #[must_use]
    pub fn selector(&self) -> Vec<PageToken> {
        page_selector(self.current_page, self.total_pages)
    }
}

/// One entry of the page selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "page")]
pub enum PageToken {
    /// A clickable page number
    Page(usize),
    /// Collapsed run of hidden pages
    Ellipsis,
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => write!(f, "{page}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// Page numbers to render around `current` out of `total`.
///
/// Pages 1 and `total` are always shown, as is every page within two of
/// `current`. The page three below `current` turns into an ellipsis when
/// `current > 4`, and the page three above when `current < total - 3`;
/// everything else is hidden. For `current = 5, total = 10` this gives
/// `1 ... 3 4 5 6 7 ... 10`.
#[must_use]
pub fn page_selector(current: usize, total: usize) -> Vec<PageToken> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    (1..=total)
        .filter_map(|page| {
            let ellipsis_before = current > 4 && page + 3 == current;
            let ellipsis_after = page == current + 3 && current + 3 < total;
            let shown = page == 1 || page == total || page.abs_diff(current) <= 2;

            if ellipsis_before || ellipsis_after {
                Some(PageToken::Ellipsis)
            } else if shown {
                Some(PageToken::Page(page))
            } else {
                None
            }
        })
        .collect()
}
