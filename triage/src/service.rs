//! The engine facade consumed by presentation layers.

use crate::analytics::{self, DashboardAnalytics};
use crate::archive::{self, ArchiveEnvironment, ArchiveFilter, ArchivePage};
use crate::config::HelpdeskConfig;
use crate::error::Result;
use crate::export::table::RenderOptions;
use crate::export::{self, ExportDocument, ExportFormat};
use crate::lifecycle::LifecycleManager;
use crate::queue::{QueueEnvironment, TriageSession};
use crate::store::RequestStore;
use crate::types::{OperatorRef, Request, RequestId, RequestStatus};
use helpdesk_core::environment::Clock;
use std::sync::Arc;

/// Triage and archive operations over one request store
#[derive(Clone)]
pub struct TriageService {
    lifecycle: LifecycleManager,
    config: HelpdeskConfig,
}

impl TriageService {
    /// Create a service over `store`
    #[must_use]
    pub fn new(store: Arc<dyn RequestStore>, clock: Arc<dyn Clock>, config: HelpdeskConfig) -> Self {
        Self {
            lifecycle: LifecycleManager::new(store, clock),
            config,
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &HelpdeskConfig {
        &self.config
    }

    /// The lifecycle manager behind this service
    #[must_use]
    pub const fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    /// Open a queue session for `operator`
    #[must_use]
    pub fn session(&self, operator: OperatorRef) -> TriageSession {
        TriageSession::new(QueueEnvironment::new(self.lifecycle.clone(), operator))
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Accept a `NEW` request from intake.
    ///
    /// # Errors
    ///
    /// See [`LifecycleManager::intake`].
    pub async fn intake(&self, request: Request) -> Result<Request> {
        self.lifecycle.intake(request).await
    }

    /// Requests waiting for an operator, newest first.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub async fn list_pending(&self) -> Result<Vec<Request>> {
        Ok(self.store().list(Some(RequestStatus::Pending)).await?)
    }

    /// Approve and send the AI draft.
    ///
    /// # Errors
    ///
    /// See [`LifecycleManager::approve`].
    pub async fn approve(&self, id: RequestId, operator: &OperatorRef) -> Result<Request> {
        self.lifecycle.approve(id, operator).await
    }

    /// Send an operator-written answer.
    ///
    /// # Errors
    ///
    /// See [`LifecycleManager::edit_and_send`].
    pub async fn edit_and_send(
        &self,
        id: RequestId,
        answer: &str,
        notes: Option<&str>,
        operator: &OperatorRef,
    ) -> Result<Request> {
        self.lifecycle.edit_and_send(id, answer, notes, operator).await
    }

    // ========================================================================
    // Archive
    // ========================================================================

    /// One page of the filtered archive.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub async fn query_archive(&self, filter: &ArchiveFilter, page: usize) -> Result<ArchivePage> {
        let env = ArchiveEnvironment::from_config(&self.config);
        let snapshot = self.archive_snapshot().await?;
        let result = archive::query(&snapshot, filter, page, env.paginator, env.timezone);

        tracing::debug!(
            requested_page = page,
            page = result.current_page,
            total_pages = result.total_pages,
            matched = result.matched,
            total = result.total,
            "Archive queried"
        );
        Ok(result)
    }

    /// Export every archive record matching `filter`.
    ///
    /// # Errors
    ///
    /// Store failures, or [`crate::error::TriageError::ExportFailure`].
    pub async fn export_archive(&self, filter: &ArchiveFilter, format: ExportFormat) -> Result<ExportDocument> {
        let snapshot = self.archive_snapshot().await?;
        let matched: Vec<Request> = filter
            .apply(&snapshot, self.config.timezone())
            .into_iter()
            .cloned()
            .collect();

        export::export_archive(&matched, format, &self.render_options(), self.now())
            .inspect_err(|error| tracing::warn!(%format, %error, "Archive export failed"))
    }

    /// Distinct project names in the archive.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub async fn project_options(&self) -> Result<Vec<String>> {
        Ok(archive::project_options(&self.archive_snapshot().await?))
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Dashboard analytics over all requests; `days` defaults to the configured window.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub async fn dashboard(&self, days: Option<u32>) -> Result<DashboardAnalytics> {
        let requests = self.store().list(None).await?;
        Ok(analytics::compute(
            &requests,
            days.unwrap_or(self.config.analytics.days),
            self.now(),
            self.config.timezone(),
        ))
    }

    /// Export dashboard analytics.
    ///
    /// # Errors
    ///
    /// Store failures, or [`crate::error::TriageError::ExportFailure`].
    pub async fn export_summary(&self, days: Option<u32>, format: ExportFormat) -> Result<ExportDocument> {
        let analytics = self.dashboard(days).await?;
        export::export_summary(&analytics, format, &self.render_options(), self.now())
            .inspect_err(|error| tracing::warn!(%format, %error, "Summary export failed"))
    }

    fn store(&self) -> &Arc<dyn RequestStore> {
        self.lifecycle.store()
    }

    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.lifecycle.clock().now()
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.config.timezone(), self.config.export.date_format.clone())
    }

    async fn archive_snapshot(&self) -> Result<Vec<Request>> {
        Ok(self.store().list(Some(RequestStatus::Closed)).await?)
    }
}
