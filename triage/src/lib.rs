//! # Helpdesk Triage
//!
//! Request triage and archive engine for a support desk where operators review
//! AI-drafted answers before they go out.
//!
//! ## Components
//!
//! - [`lifecycle`]: the `NEW → PENDING → {APPROVED, EDITED} → SENT → CLOSED`
//!   state machine and the [`LifecycleManager`] that commits it to a store
//! - [`queue`]: one operator's pending queue, selection and edit buffer, as a
//!   reducer driven by [`TriageSession`]
//! - [`archive`]: filter, pagination and page selector over closed requests
//! - [`export`]: CSV, JSON and spreadsheet-friendly HTML renderings of archive
//!   results and dashboard summaries
//! - [`analytics`]: dashboard counters and per-day series
//! - [`service`]: the [`TriageService`] facade tying these to a
//!   [`store::RequestStore`]
//!
//! ## Example
//!
//! ```ignore
//! use helpdesk_triage::{TriageService, HelpdeskConfig, store::InMemoryRequestStore};
//!
//! let service = TriageService::new(
//!     Arc::new(InMemoryRequestStore::new()),
//!     Arc::new(SystemClock),
//!     HelpdeskConfig::from_env(),
//! );
//! service.intake(request).await?;
//! let closed = service.approve(request_id, &operator).await?;
//! let page = service.query_archive(&ArchiveFilter::new().with_text("refund"), 1).await?;
//! ```

pub mod analytics;
pub mod archive;
pub mod config;
pub mod error;
pub mod export;
pub mod lifecycle;
pub mod queue;
pub mod service;
pub mod store;
pub mod types;

pub use archive::{ArchiveFilter, ArchivePage, FieldMatch, PageToken};
pub use config::HelpdeskConfig;
pub use error::{Result, StoreError, TriageError};
pub use export::{ExportDocument, ExportFormat};
pub use lifecycle::{LifecycleAction, LifecycleManager};
pub use queue::TriageSession;
pub use service::TriageService;
pub use types::{Channel, OperatorRef, Request, RequestId, RequestStatus, Resolution};
