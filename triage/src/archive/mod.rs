//! Archive filtering, pagination and browsing.
//!
//! Everything here is a pure computation over a snapshot of closed requests.
//! The same [`ArchiveFilter`] drives the on-screen pages and the exports, so a
//! download always contains exactly the records the operator could page
//! through.

pub mod browser;
pub mod filter;
pub mod pagination;
pub mod query;

pub use browser::{ArchiveBrowserAction, ArchiveBrowserReducer, ArchiveBrowserState, ArchiveEnvironment};
pub use filter::{ArchiveFilter, FieldMatch, MATCH_ALL};
pub use pagination::{Page, PageToken, Paginator, page_selector};
pub use query::{ArchivePage, archived, project_options, query};
