//! Unit tests for lifecycle commands and the lifecycle manager.
//!
//! These tests verify:
//! - Intake normalisation and the NEW → PENDING auto-advance
//! - Approve and edit-and-send as atomic PENDING → CLOSED actions
//! - Rejections leave records byte-identical
//! - Lost races surface as `InvalidTransition` or `Conflict`

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use super::commands;
use super::*;
use crate::error::{StoreError, TriageError};
use crate::store::{InMemoryRequestStore, RequestStore, StoreResult};
use crate::types::{Channel, OperatorRef, Request, RequestId, RequestStatus, Resolution};
use async_trait::async_trait;
use chrono::Duration;
use helpdesk_core::environment::Clock;
use helpdesk_testing::{ManualClock, test_time};
use std::sync::{Arc, Mutex};

fn operator() -> OperatorRef {
    OperatorRef::new(7, "Anna Petrova")
}

fn new_request(id: u64) -> Request {
    let mut request = Request::new(
        RequestId::new(id),
        Channel::Email,
        "Where is my refund?",
        "Refund in 5-7 days",
        0.62,
        test_time(),
    );
    request.email = Some("client@example.com".to_string());
    request.category = Some(" billing ".to_string());
    request
}

fn pending_request(id: u64) -> Request {
    commands::intake(&new_request(id), test_time()).unwrap()
}

// ============================================================================
// Pure commands
// ============================================================================

#[test]
fn test_intake_advances_to_pending_and_normalises() {
    let mut raw = new_request(1);
    raw.operator_answer = Some("leaked".to_string());

    let pending = commands::intake(&raw, test_time() + Duration::seconds(3)).unwrap();

    assert_eq!(pending.status, RequestStatus::Pending);
    assert_eq!(pending.category.as_deref(), Some("BILLING"));
    assert_eq!(pending.operator_answer, None);
    assert_eq!(pending.updated_at, test_time() + Duration::seconds(3));
    assert_eq!(pending.check_invariants(), Ok(()));
}

#[test]
fn test_intake_rejects_non_new_and_bad_confidence() {
    let pending = pending_request(1);
    assert!(matches!(
        commands::intake(&pending, test_time()),
        Err(TriageError::InvalidTransition {
            status: RequestStatus::Pending,
            action: LifecycleAction::Intake,
            ..
        })
    ));

    let mut raw = new_request(2);
    raw.confidence_score = 1.5;
    assert!(matches!(
        commands::intake(&raw, test_time()),
        Err(TriageError::InvalidRecord(_))
    ));

    raw.confidence_score = f64::NAN;
    assert!(matches!(
        commands::intake(&raw, test_time()),
        Err(TriageError::InvalidRecord(_))
    ));
}

#[test]
fn test_approve_copies_draft_and_closes() {
    let pending = pending_request(1);
    let sent_at = test_time() + Duration::minutes(10);

    let closed = commands::approve(&pending, &operator(), sent_at).unwrap();

    assert_eq!(closed.status, RequestStatus::Closed);
    assert_eq!(closed.operator_answer.as_deref(), Some("Refund in 5-7 days"));
    assert_eq!(closed.responded_at, Some(sent_at));
    assert_eq!(closed.updated_at, sent_at);
    assert_eq!(closed.resolution, Some(Resolution::Approved));
    assert_eq!(closed.assigned_operator, Some(operator()));
    assert_eq!(closed.version, pending.version + 1);
    assert_eq!(closed.check_invariants(), Ok(()));
}

#[test]
fn test_edit_and_send_stores_answer_and_notes() {
    let pending = pending_request(1);

    let closed = commands::edit_and_send(
        &pending,
        "We refunded you today.",
        Some("customer called twice"),
        &operator(),
        test_time(),
    )
    .unwrap();

    assert_eq!(closed.status, RequestStatus::Closed);
    assert_eq!(closed.operator_answer.as_deref(), Some("We refunded you today."));
    assert_eq!(closed.operator_notes.as_deref(), Some("customer called twice"));
    assert_eq!(closed.resolution, Some(Resolution::Edited));
    assert_eq!(closed.check_invariants(), Ok(()));
}

#[test]
fn test_edit_and_send_blank_notes_are_dropped() {
    let closed =
        commands::edit_and_send(&pending_request(1), "Answer", Some("  "), &operator(), test_time())
            .unwrap();
    assert_eq!(closed.operator_notes, None);
}

#[test]
fn test_edit_and_send_rejects_blank_answer() {
    let pending = pending_request(1);
    for blank in ["", "   ", "\n\t"] {
        assert_eq!(
            commands::edit_and_send(&pending, blank, Some("n"), &operator(), test_time()),
            Err(TriageError::EmptyAnswer)
        );
    }
}

#[test]
fn test_operator_actions_rejected_outside_pending() {
    let new = new_request(1);
    let closed = commands::approve(&pending_request(2), &operator(), test_time()).unwrap();

    for record in [&new, &closed] {
        let before = record.clone();
        assert!(matches!(
            commands::approve(record, &operator(), test_time()),
            Err(TriageError::InvalidTransition { action: LifecycleAction::Approve, .. })
        ));
        assert!(matches!(
            commands::edit_and_send(record, "x", None, &operator(), test_time()),
            Err(TriageError::InvalidTransition { action: LifecycleAction::EditAndSend, .. })
        ));
        assert_eq!(record, &before);
    }
}

#[test]
fn test_invalid_transition_wins_over_empty_answer() {
    let closed = commands::approve(&pending_request(1), &operator(), test_time()).unwrap();
    assert!(matches!(
        commands::edit_and_send(&closed, "", None, &operator(), test_time()),
        Err(TriageError::InvalidTransition { .. })
    ));
}

// ============================================================================
// Manager against a store
// ============================================================================

fn manager_over(store: Arc<dyn RequestStore>) -> (LifecycleManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(test_time()));
    (LifecycleManager::new(store, clock.clone()), clock)
}

#[tokio::test]
async fn test_manager_intake_then_approve() {
    let store = Arc::new(InMemoryRequestStore::new());
    let (manager, clock) = manager_over(store.clone());

    manager.intake(new_request(1)).await.unwrap();
    assert_eq!(store.list(Some(RequestStatus::Pending)).await.unwrap().len(), 1);

    clock.advance(Duration::minutes(2));
    let closed = manager.approve(RequestId::new(1), &operator()).await.unwrap();

    assert_eq!(closed.responded_at, Some(test_time() + Duration::minutes(2)));
    assert_eq!(store.get(RequestId::new(1)).await.unwrap(), closed);
    assert!(store.list(Some(RequestStatus::Pending)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_manager_second_approve_is_invalid_transition() {
    let store = Arc::new(InMemoryRequestStore::new());
    let (manager, _clock) = manager_over(store.clone());
    manager.intake(new_request(1)).await.unwrap();

    manager.approve(RequestId::new(1), &operator()).await.unwrap();
    let stored = store.get(RequestId::new(1)).await.unwrap();

    let second = manager.approve(RequestId::new(1), &operator()).await;
    assert!(matches!(
        second,
        Err(TriageError::InvalidTransition { status: RequestStatus::Closed, .. })
    ));
    assert_eq!(store.get(RequestId::new(1)).await.unwrap(), stored);
}

#[tokio::test]
async fn test_manager_empty_answer_keeps_pending() {
    let store = Arc::new(InMemoryRequestStore::new());
    let (manager, _clock) = manager_over(store.clone());
    manager.intake(new_request(1)).await.unwrap();

    let result = manager
        .edit_and_send(RequestId::new(1), "", Some("notes"), &operator())
        .await;

    assert_eq!(result, Err(TriageError::EmptyAnswer));
    let stored = store.get(RequestId::new(1)).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
    assert_eq!(stored.operator_answer, None);
}

#[tokio::test]
async fn test_manager_unknown_id() {
    let (manager, _clock) = manager_over(Arc::new(InMemoryRequestStore::new()));
    assert_eq!(
        manager.approve(RequestId::new(404), &operator()).await,
        Err(TriageError::NotFound(RequestId::new(404)))
    );
}

#[tokio::test]
async fn test_manager_duplicate_intake_conflicts() {
    let (manager, _clock) = manager_over(Arc::new(InMemoryRequestStore::new()));
    manager.intake(new_request(1)).await.unwrap();
    assert_eq!(
        manager.intake(new_request(1)).await,
        Err(TriageError::Conflict(RequestId::new(1)))
    );
}

/// Store whose next `get` returns a snapshot taken before a concurrent change
struct StaleReadStore {
    inner: InMemoryRequestStore,
    stale: Mutex<Option<Request>>,
}

impl StaleReadStore {
    fn serve_stale(&self, request: Request) {
        *self.stale.lock().unwrap() = Some(request);
    }
}

#[async_trait]
impl RequestStore for StaleReadStore {
    async fn list(&self, status: Option<RequestStatus>) -> StoreResult<Vec<Request>> {
        self.inner.list(status).await
    }

    async fn get(&self, id: RequestId) -> StoreResult<Request> {
        let stale = self.stale.lock().unwrap().take();
        match stale {
            Some(request) => Ok(request),
            None => self.inner.get(id).await,
        }
    }

    async fn insert(&self, request: Request) -> StoreResult<()> {
        self.inner.insert(request).await
    }

    async fn save(&self, request: Request) -> StoreResult<()> {
        self.inner.save(request).await
    }
}

#[tokio::test]
async fn test_lost_race_reports_invalid_transition() {
    let pending = pending_request(1);
    let store = Arc::new(StaleReadStore {
        inner: InMemoryRequestStore::with_requests([pending.clone()]),
        stale: Mutex::new(None),
    });
    let (first, _) = manager_over(store.clone());
    let (second, _) = manager_over(store.clone());

    let winner = first.approve(RequestId::new(1), &operator()).await.unwrap();

    store.serve_stale(pending);
    let loser = second
        .edit_and_send(RequestId::new(1), "My own answer", None, &OperatorRef::new(8, "Ivan"))
        .await;

    assert!(matches!(
        loser,
        Err(TriageError::InvalidTransition {
            status: RequestStatus::Closed,
            action: LifecycleAction::EditAndSend,
            ..
        })
    ));
    assert_eq!(store.inner.get(RequestId::new(1)).await.unwrap(), winner);
}

#[tokio::test]
async fn test_revision_conflict_while_still_pending() {
    let pending = pending_request(1);
    let mut touched = pending.clone();
    touched.version += 1;
    touched.project = Some("Renamed".to_string());

    let store = Arc::new(StaleReadStore {
        inner: InMemoryRequestStore::with_requests([touched.clone()]),
        stale: Mutex::new(None),
    });
    let (manager, _) = manager_over(store.clone());

    store.serve_stale(pending);
    assert_eq!(
        manager.approve(RequestId::new(1), &operator()).await,
        Err(TriageError::Conflict(RequestId::new(1)))
    );
    assert_eq!(store.inner.get(RequestId::new(1)).await.unwrap(), touched);

    // After reloading, the retry goes through
    let closed = manager.approve(RequestId::new(1), &operator()).await.unwrap();
    assert_eq!(closed.project.as_deref(), Some("Renamed"));
}

#[tokio::test]
async fn test_store_conflict_error_is_mapped() {
    let store = InMemoryRequestStore::with_requests([pending_request(1)]);
    let err = store.save(pending_request(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));
    assert_eq!(TriageError::from(err), TriageError::Conflict(RequestId::new(1)));
}

#[test]
fn test_manual_clock_is_shared_with_manager() {
    let (manager, clock) = manager_over(Arc::new(InMemoryRequestStore::new()));
    clock.advance(Duration::hours(1));
    assert_eq!(manager.clock().now(), test_time() + Duration::hours(1));
}
