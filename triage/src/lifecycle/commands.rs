//! Pure lifecycle commands.
//!
//! Each command takes the current record by reference and returns the next
//! revision. The input is never touched, so a rejected command cannot leave a
//! half-updated record behind.

use super::LifecycleAction;
use crate::error::{Result, TriageError};
use crate::types::{OperatorRef, Request, RequestStatus, Resolution, category};
use chrono::{DateTime, Utc};

/// Move `request` along `action`, or explain why it cannot move
fn step(request: &mut Request, action: LifecycleAction) -> Result<()> {
    let next = request
        .status
        .next(action)
        .ok_or(TriageError::InvalidTransition {
            id: request.id,
            status: request.status,
            action,
        })?;
    request.status = next;
    Ok(())
}

/// Check that `action` is legal without producing a revision
///
/// # Errors
///
/// Returns [`TriageError::InvalidTransition`] if the action is illegal.
pub fn ensure_allowed(request: &Request, action: LifecycleAction) -> Result<()> {
    match request.status.next(action) {
        Some(_) => Ok(()),
        None => Err(TriageError::InvalidTransition {
            id: request.id,
            status: request.status,
            action,
        }),
    }
}

/// Accept a `NEW` record from intake and advance it to `PENDING`.
///
/// Operator-owned fields are cleared and the category is normalised.
///
/// # Errors
///
/// - [`TriageError::InvalidTransition`] if the record is not `NEW`
/// - [`TriageError::InvalidRecord`] if the confidence score is outside `[0, 1]`
pub fn intake(request: &Request, now: DateTime<Utc>) -> Result<Request> {
    ensure_allowed(request, LifecycleAction::Intake)?;

    if !(0.0..=1.0).contains(&request.confidence_score) {
        return Err(TriageError::InvalidRecord(format!(
            "confidence score {} of request {} is outside [0, 1]",
            request.confidence_score, request.id
        )));
    }

    let mut next = request.clone();
    next.category = Some(category::normalize(request.category.as_deref()));
    next.operator_answer = None;
    next.operator_notes = None;
    next.resolution = None;
    next.assigned_operator = None;
    next.responded_at = None;
    step(&mut next, LifecycleAction::Intake)?;
    next.updated_at = now;
    Ok(next)
}

/// Approve the AI draft and send it, as one operator action.
///
/// # Errors
///
/// Returns [`TriageError::InvalidTransition`] unless the record is `PENDING`.
pub fn approve(request: &Request, operator: &OperatorRef, now: DateTime<Utc>) -> Result<Request> {
    ensure_allowed(request, LifecycleAction::Approve)?;

    let mut next = request.clone();
    next.operator_answer = Some(request.ai_draft_answer.clone());
    next.resolution = Some(Resolution::Approved);
    next.assigned_operator = Some(operator.clone());
    step(&mut next, LifecycleAction::Approve)?;
    send(&mut next, now)?;
    Ok(next)
}

/// Replace the AI draft with the operator's answer and send it.
///
/// `notes` are stored as internal notes; blank notes are stored as `None`.
///
/// # Errors
///
/// - [`TriageError::InvalidTransition`] unless the record is `PENDING`
/// - [`TriageError::EmptyAnswer`] if `answer` is blank
pub fn edit_and_send(
    request: &Request,
    answer: &str,
    notes: Option<&str>,
    operator: &OperatorRef,
    now: DateTime<Utc>,
) -> Result<Request> {
    ensure_allowed(request, LifecycleAction::EditAndSend)?;

    if answer.trim().is_empty() {
        return Err(TriageError::EmptyAnswer);
    }

    let mut next = request.clone();
    next.operator_answer = Some(answer.to_string());
    next.operator_notes = notes.filter(|n| !n.trim().is_empty()).map(str::to_string);
    next.resolution = Some(Resolution::Edited);
    next.assigned_operator = Some(operator.clone());
    step(&mut next, LifecycleAction::EditAndSend)?;
    send(&mut next, now)?;
    Ok(next)
}

/// Deliver and archive an `APPROVED`/`EDITED` revision in place.
///
/// Only ever applied to a private working copy, so the intermediate `SENT`
/// state is never observable.
fn send(request: &mut Request, now: DateTime<Utc>) -> Result<()> {
    step(request, LifecycleAction::Send)?;
    request.responded_at = Some(now);
    step(request, LifecycleAction::Archive)?;
    request.updated_at = now;
    request.version += 1;
    debug_assert_eq!(request.status, RequestStatus::Closed);
    Ok(())
}
