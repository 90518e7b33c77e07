//! Lifecycle manager: pure commands plus the store round-trip.

use super::commands;
use super::LifecycleAction;
use crate::error::{Result, StoreError, TriageError};
use crate::store::RequestStore;
use crate::types::{OperatorRef, Request, RequestId};
use helpdesk_core::environment::Clock;
use std::sync::Arc;

/// Applies lifecycle commands to records held by a [`RequestStore`].
///
/// Every operation loads the record, computes the next revision with a pure
/// command and saves it. The store re-checks the revision at commit time, so
/// when two operators race on one request the loser sees
/// [`TriageError::InvalidTransition`] instead of overwriting the winner.
#[derive(Clone)]
pub struct LifecycleManager {
    store: Arc<dyn RequestStore>,
    clock: Arc<dyn Clock>,
}

impl LifecycleManager {
    /// Create a manager over `store`
    #[must_use]
    pub fn new(store: Arc<dyn RequestStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The store this manager writes to
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RequestStore> {
        &self.store
    }

    /// The clock used for timestamps
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Accept a `NEW` request from intake; it becomes `PENDING`.
    ///
    /// # Errors
    ///
    /// - [`TriageError::InvalidTransition`] if the request is not `NEW`
    /// - [`TriageError::InvalidRecord`] if the payload violates the data model
    /// - [`TriageError::Conflict`] if the id already exists
    pub async fn intake(&self, request: Request) -> Result<Request> {
        let pending = commands::intake(&request, self.clock.now()).inspect_err(|error| {
            tracing::warn!(request_id = %request.id, %error, "Intake rejected");
        })?;

        self.store.insert(pending.clone()).await?;

        tracing::info!(
            request_id = %pending.id,
            channel = %pending.channel,
            category = pending.category.as_deref().unwrap_or_default(),
            "Request queued for triage"
        );
        Ok(pending)
    }

    /// Approve the AI draft of a `PENDING` request and send it.
    ///
    /// # Errors
    ///
    /// - [`TriageError::NotFound`] if the id is unknown
    /// - [`TriageError::InvalidTransition`] if the request is not `PENDING`,
    ///   including when a concurrent action got there first
    /// - [`TriageError::Conflict`] if the record changed concurrently but is
    ///   still `PENDING`
    pub async fn approve(&self, id: RequestId, operator: &OperatorRef) -> Result<Request> {
        let current = self.store.get(id).await?;
        let next = commands::approve(&current, operator, self.clock.now())
            .inspect_err(|error| Self::log_rejection(id, error))?;

        self.commit(next, LifecycleAction::Approve).await
    }

    /// Send the operator's own answer for a `PENDING` request.
    ///
    /// # Errors
    ///
    /// - [`TriageError::NotFound`] if the id is unknown
    /// - [`TriageError::EmptyAnswer`] if `answer` is blank
    /// - [`TriageError::InvalidTransition`] if the request is not `PENDING`
    /// - [`TriageError::Conflict`] as for [`Self::approve`]
    pub async fn edit_and_send(
        &self,
        id: RequestId,
        answer: &str,
        notes: Option<&str>,
        operator: &OperatorRef,
    ) -> Result<Request> {
        let current = self.store.get(id).await?;
        let next = commands::edit_and_send(&current, answer, notes, operator, self.clock.now())
            .inspect_err(|error| Self::log_rejection(id, error))?;

        self.commit(next, LifecycleAction::EditAndSend).await
    }

    /// Save a computed revision, translating lost races into the error the
    /// caller would have seen had it loaded the record a moment later.
    async fn commit(&self, next: Request, action: LifecycleAction) -> Result<Request> {
        let id = next.id;
        match self.store.save(next.clone()).await {
            Ok(()) => {
                tracing::info!(
                    request_id = %id,
                    %action,
                    status = %next.status,
                    operator = next.assigned_operator.as_ref().map_or("", |o| o.name.as_str()),
                    "Response sent and request archived"
                );
                Ok(next)
            },
            Err(StoreError::Conflict { stored, incoming, .. }) => {
                tracing::warn!(request_id = %id, %action, stored, incoming, "Revision conflict");
                let fresh = self.store.get(id).await?;
                commands::ensure_allowed(&fresh, action)?;
                Err(TriageError::Conflict(id))
            },
            Err(other) => Err(other.into()),
        }
    }

    fn log_rejection(id: RequestId, error: &TriageError) {
        tracing::warn!(request_id = %id, %error, "Lifecycle action rejected");
    }
}
