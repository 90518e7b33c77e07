//! Archive browser reducer: filter form plus page cursor over a snapshot.

use super::filter::{ArchiveFilter, FieldMatch};
use super::pagination::Paginator;
use super::query::{ArchivePage, archived, project_options, query};
use crate::config::HelpdeskConfig;
use crate::types::Request;
use chrono::{FixedOffset, NaiveDate};
use helpdesk_core::{SmallVec, effect::Effect, reducer::Reducer};

/// Environment for the archive browser
#[derive(Clone, Copy, Debug)]
pub struct ArchiveEnvironment {
    /// Page windowing
    pub paginator: Paginator,
    /// Evaluation timezone for date bounds
    pub timezone: FixedOffset,
}

impl ArchiveEnvironment {
    /// Creates a new `ArchiveEnvironment`
    #[must_use]
    pub const fn new(paginator: Paginator, timezone: FixedOffset) -> Self {
        Self { paginator, timezone }
    }

    /// Environment built from engine configuration
    #[must_use]
    pub fn from_config(config: &HelpdeskConfig) -> Self {
        Self::new(Paginator::new(config.archive.page_size), config.timezone())
    }
}

/// State of an archive screen
#[derive(Clone, Debug)]
pub struct ArchiveBrowserState {
    archive: Vec<Request>,
    filter: ArchiveFilter,
    current_page: usize,
}

impl Default for ArchiveBrowserState {
    fn default() -> Self {
        Self {
            archive: Vec::new(),
            filter: ArchiveFilter::new(),
            current_page: 1,
        }
    }
}

impl ArchiveBrowserState {
    /// Browser over an empty archive
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The archive snapshot, in display order
    #[must_use]
    pub fn archive(&self) -> &[Request] {
        &self.archive
    }

    /// Current filter
    #[must_use]
    pub const fn filter(&self) -> &ArchiveFilter {
        &self.filter
    }

    /// Current 1-indexed page
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Project names offered by the project selector
    #[must_use]
    pub fn project_options(&self) -> Vec<String> {
        project_options(&self.archive)
    }

    /// The screen as it should be rendered now
    #[must_use]
    pub fn view(&self, env: &ArchiveEnvironment) -> ArchivePage {
        query(&self.archive, &self.filter, self.current_page, env.paginator, env.timezone)
    }

    fn matched(&self, env: &ArchiveEnvironment) -> usize {
        self.filter.apply(&self.archive, env.timezone).len()
    }

    fn update_filter(&mut self, update: impl FnOnce(&mut ArchiveFilter)) {
        let before = self.filter.clone();
        update(&mut self.filter);
        if self.filter != before {
            self.current_page = 1;
        }
    }
}

/// Actions of the archive browser
#[derive(Clone, Debug, PartialEq)]
pub enum ArchiveBrowserAction {
    /// Replace the archive snapshot; non-closed records are dropped
    Load {
        /// Records in display order
        records: Vec<Request>,
    },
    /// Change the free-text query
    SetTextQuery {
        /// New query
        text: String,
    },
    /// Change the category selector (`"ALL"` or blank selects all)
    SetCategory {
        /// Raw selector value
        value: String,
    },
    /// Change the project selector (`"ALL"` or blank selects all)
    SetProject {
        /// Raw selector value
        value: String,
    },
    /// Change the first included day
    SetDateFrom {
        /// Day, or `None` to open the bound
        date: Option<NaiveDate>,
    },
    /// Change the last included day
    SetDateTo {
        /// Day, or `None` to open the bound
        date: Option<NaiveDate>,
    },
    /// Drop every filter criterion
    ResetFilters,
    /// Move the page cursor
    GoToPage {
        /// Requested page, clamped to the available range
        page: usize,
    },
}

/// Reducer for the archive browser.
///
/// Pure: it never returns effects. Any change to the filter moves the cursor
/// back to page 1; loading a smaller archive clamps it.
#[derive(Clone, Debug, Default)]
pub struct ArchiveBrowserReducer;

impl ArchiveBrowserReducer {
    /// Creates a new `ArchiveBrowserReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ArchiveBrowserReducer {
    type State = ArchiveBrowserState;
    type Action = ArchiveBrowserAction;
    type Environment = ArchiveEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ArchiveBrowserAction::Load { records } => {
                state.archive = archived(records);
                state.current_page = env.paginator.clamp_page(state.current_page, state.matched(env));
                tracing::debug!(
                    archived = state.archive.len(),
                    page = state.current_page,
                    "Archive snapshot loaded"
                );
            },
            ArchiveBrowserAction::SetTextQuery { text } => {
                state.update_filter(|filter| filter.text_query = text);
            },
            ArchiveBrowserAction::SetCategory { value } => {
                state.update_filter(|filter| filter.category = FieldMatch::parse(&value));
            },
            ArchiveBrowserAction::SetProject { value } => {
                state.update_filter(|filter| filter.project = FieldMatch::parse(&value));
            },
            ArchiveBrowserAction::SetDateFrom { date } => {
                state.update_filter(|filter| filter.date_from = date);
            },
            ArchiveBrowserAction::SetDateTo { date } => {
                state.update_filter(|filter| filter.date_to = date);
            },
            ArchiveBrowserAction::ResetFilters => {
                state.update_filter(|filter| *filter = ArchiveFilter::new());
            },
            ArchiveBrowserAction::GoToPage { page } => {
                state.current_page = env.paginator.clamp_page(page, state.matched(env));
            },
        }
        SmallVec::new()
    }
}
