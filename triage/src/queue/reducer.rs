//! Reducer for the triage queue.

use super::{TriageQueueAction, TriageQueueState};
use crate::error::TriageError;
use crate::lifecycle::LifecycleManager;
use crate::types::{OperatorRef, RequestId};
use helpdesk_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Environment dependencies for the triage queue reducer
#[derive(Clone)]
pub struct QueueEnvironment {
    /// Commits approve/edit actions to the store
    pub lifecycle: LifecycleManager,
    /// Operator driving this queue
    pub operator: OperatorRef,
}

impl QueueEnvironment {
    /// Creates a new `QueueEnvironment`
    #[must_use]
    pub const fn new(lifecycle: LifecycleManager, operator: OperatorRef) -> Self {
        Self { lifecycle, operator }
    }
}

/// Reducer for one operator's triage queue.
///
/// Selection and the edit buffer are handled synchronously. Approve and submit
/// validate locally, mark the request in flight and return a single
/// `Effect::Future` that commits through the [`LifecycleManager`] and feeds back
/// `Committed` or `Rejected`.
#[derive(Clone, Debug, Default)]
pub struct TriageQueueReducer;

impl TriageQueueReducer {
    /// Creates a new `TriageQueueReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The selected request id, if a commit may start for it
    fn commit_target(state: &TriageQueueState) -> Option<RequestId> {
        if state.in_flight().is_some() {
            return None;
        }
        state.selected_id()
    }

    fn feedback(id: RequestId, result: crate::error::Result<crate::types::Request>) -> TriageQueueAction {
        match result {
            Ok(request) => TriageQueueAction::Committed { request },
            Err(error) => TriageQueueAction::Rejected { id, error },
        }
    }
}

impl Reducer for TriageQueueReducer {
    type State = TriageQueueState;
    type Action = TriageQueueAction;
    type Environment = QueueEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Operator intents ==========
            TriageQueueAction::Loaded { requests } => {
                state.last_error = None;
                state.replace_pending(requests);
                SmallVec::new()
            },

            TriageQueueAction::Select { id } => {
                state.last_error = None;
                if state.selected_id() == Some(id) {
                    return SmallVec::new();
                }
                if state.get(id).is_none() {
                    state.last_error = Some(TriageError::NotFound(id));
                    return SmallVec::new();
                }
                state.select(Some(id));
                SmallVec::new()
            },

            TriageQueueAction::ClearSelection => {
                state.last_error = None;
                state.select(None);
                SmallVec::new()
            },

            TriageQueueAction::EditAnswer { text } => {
                if state.selected_id().is_some() {
                    state.draft_mut().answer = text;
                }
                SmallVec::new()
            },

            TriageQueueAction::EditNotes { text } => {
                if state.selected_id().is_some() {
                    state.draft_mut().notes = text;
                }
                SmallVec::new()
            },

            TriageQueueAction::ApproveSelected => {
                state.last_error = None;
                let Some(id) = Self::commit_target(state) else {
                    return SmallVec::new();
                };
                state.set_in_flight(Some(id));

                let lifecycle = env.lifecycle.clone();
                let operator = env.operator.clone();
                smallvec![Effect::future(async move {
                    Some(Self::feedback(id, lifecycle.approve(id, &operator).await))
                })]
            },

            TriageQueueAction::SubmitSelected => {
                state.last_error = None;
                let Some(id) = Self::commit_target(state) else {
                    return SmallVec::new();
                };
                if state.draft().answer.trim().is_empty() {
                    state.last_error = Some(TriageError::EmptyAnswer);
                    return SmallVec::new();
                }
                state.set_in_flight(Some(id));

                let lifecycle = env.lifecycle.clone();
                let operator = env.operator.clone();
                let answer = state.draft().answer.clone();
                let notes = state.draft().notes().map(str::to_string);
                smallvec![Effect::future(async move {
                    let result = lifecycle
                        .edit_and_send(id, &answer, notes.as_deref(), &operator)
                        .await;
                    Some(Self::feedback(id, result))
                })]
            },

            // ========== Feedback ==========
            TriageQueueAction::Committed { request } => {
                state.set_in_flight(None);
                state.remove(request.id);
                state.last_committed = Some(request);
                SmallVec::new()
            },

            TriageQueueAction::Rejected { id, error } => {
                state.set_in_flight(None);
                // The request is no longer actionable here; drop the stale copy
                if matches!(
                    error,
                    TriageError::InvalidTransition { .. } | TriageError::NotFound(_)
                ) {
                    state.remove(id);
                }
                state.last_error = Some(error);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::lifecycle::LifecycleAction;
    use crate::store::InMemoryRequestStore;
    use crate::types::{Channel, Request, RequestStatus};
    use helpdesk_testing::{ReducerTest, assertions, test_clock, test_time};
    use std::sync::Arc;

    fn pending(id: u64, minutes: i64) -> Request {
        let mut request = Request::new(
            RequestId::new(id),
            Channel::Form,
            format!("message {id}"),
            format!("draft {id}"),
            0.5,
            test_time() + chrono::Duration::minutes(minutes),
        );
        request.status = RequestStatus::Pending;
        request
    }

    fn env() -> QueueEnvironment {
        let lifecycle = LifecycleManager::new(
            Arc::new(InMemoryRequestStore::new()),
            Arc::new(test_clock()),
        );
        QueueEnvironment::new(lifecycle, OperatorRef::new(1, "Operator"))
    }

    /// Three pending requests; newest first gives ids 3, 2, 1
    fn queue() -> TriageQueueState {
        TriageQueueState::with_requests([pending(1, 0), pending(2, 5), pending(3, 10)])
    }

    fn ids(state: &TriageQueueState) -> Vec<u64> {
        state.pending().iter().map(|r| r.id.value()).collect()
    }

    #[test]
    fn test_loaded_keeps_only_pending_newest_first() {
        let mut closed = pending(9, 100);
        closed.status = RequestStatus::Closed;

        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(TriageQueueState::new())
            .when_action(TriageQueueAction::Loaded {
                requests: vec![pending(1, 0), closed, pending(2, 0), pending(3, 10)],
            })
            .then_state(|state| assert_eq!(ids(state), vec![3, 1, 2]))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_select_seeds_draft_from_ai_answer() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(2) })
            .then_state(|state| {
                assert_eq!(state.selected_id(), Some(RequestId::new(2)));
                assert_eq!(state.draft().answer, "draft 2");
                assert_eq!(state.draft().notes, "");
            })
            .run();
    }

    #[test]
    fn test_reselect_discards_buffer_but_same_selection_keeps_it() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(2) })
            .when_action(TriageQueueAction::EditAnswer { text: "edited".to_string() })
            .when_action(TriageQueueAction::Select { id: RequestId::new(2) })
            .then_state(|state| assert_eq!(state.draft().answer, "edited"))
            .run();

        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(2) })
            .when_action(TriageQueueAction::EditAnswer { text: "edited".to_string() })
            .when_action(TriageQueueAction::EditNotes { text: "note".to_string() })
            .when_action(TriageQueueAction::Select { id: RequestId::new(3) })
            .then_state(|state| {
                assert_eq!(state.draft().answer, "draft 3");
                assert_eq!(state.draft().notes, "");
            })
            .run();
    }

    #[test]
    fn test_select_unknown_reports_not_found() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(77) })
            .then_state(|state| {
                assert_eq!(state.selected_id(), None);
                assert_eq!(state.last_error, Some(TriageError::NotFound(RequestId::new(77))));
            })
            .run();
    }

    #[test]
    fn test_edits_without_selection_are_ignored() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::EditAnswer { text: "lost".to_string() })
            .then_state(|state| assert_eq!(state.draft().answer, ""))
            .run();
    }

    #[test]
    fn test_approve_emits_commit_effect() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(3) })
            .when_action(TriageQueueAction::ApproveSelected)
            .then_state(|state| {
                assert_eq!(state.in_flight(), Some(RequestId::new(3)));
                assert_eq!(state.len(), 3);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_approve_without_selection_does_nothing() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::ApproveSelected)
            .then_state(|state| assert_eq!(state.in_flight(), None))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_second_commit_waits_for_first() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(3) })
            .when_action(TriageQueueAction::ApproveSelected)
            .when_action(TriageQueueAction::SubmitSelected)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_submit_blank_answer_fails_locally() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(1) })
            .when_action(TriageQueueAction::EditAnswer { text: "   ".to_string() })
            .when_action(TriageQueueAction::SubmitSelected)
            .then_state(|state| {
                assert_eq!(state.last_error, Some(TriageError::EmptyAnswer));
                assert_eq!(state.in_flight(), None);
                assert_eq!(state.draft().answer, "   ");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_committed_selects_next_item() {
        let mut closed = pending(2, 5);
        closed.status = RequestStatus::Closed;

        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(2) })
            .when_action(TriageQueueAction::Committed { request: closed })
            .then_state(|state| {
                assert_eq!(ids(state), vec![3, 1]);
                assert_eq!(state.selected_id(), Some(RequestId::new(1)));
                assert_eq!(state.draft().answer, "draft 1");
                assert_eq!(state.last_committed.as_ref().map(|r| r.id), Some(RequestId::new(2)));
            })
            .run();
    }

    #[test]
    fn test_committing_last_item_falls_back_to_previous_then_none() {
        let single = TriageQueueState::with_requests([pending(5, 0)]);

        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(single)
            .when_action(TriageQueueAction::Select { id: RequestId::new(5) })
            .when_action(TriageQueueAction::Committed { request: pending(5, 0) })
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(state.selected_id(), None);
                assert_eq!(state.draft().answer, "");
            })
            .run();

        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(1) })
            .when_action(TriageQueueAction::Committed { request: pending(1, 0) })
            .then_state(|state| assert_eq!(state.selected_id(), Some(RequestId::new(2))))
            .run();
    }

    #[test]
    fn test_rejected_invalid_transition_drops_stale_item() {
        let error = TriageError::InvalidTransition {
            id: RequestId::new(3),
            status: RequestStatus::Closed,
            action: LifecycleAction::Approve,
        };

        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(3) })
            .when_action(TriageQueueAction::Rejected { id: RequestId::new(3), error: error.clone() })
            .then_state(move |state| {
                assert_eq!(ids(state), vec![2, 1]);
                assert_eq!(state.selected_id(), Some(RequestId::new(2)));
                assert_eq!(state.last_error, Some(error));
            })
            .run();
    }

    #[test]
    fn test_rejected_conflict_keeps_buffer() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(3) })
            .when_action(TriageQueueAction::EditAnswer { text: "mine".to_string() })
            .when_action(TriageQueueAction::Rejected {
                id: RequestId::new(3),
                error: TriageError::Conflict(RequestId::new(3)),
            })
            .then_state(|state| {
                assert_eq!(state.len(), 3);
                assert_eq!(state.selected_id(), Some(RequestId::new(3)));
                assert_eq!(state.draft().answer, "mine");
            })
            .run();
    }

    #[test]
    fn test_reload_without_selected_item_falls_back() {
        ReducerTest::new(TriageQueueReducer::new())
            .with_env(env())
            .given_state(queue())
            .when_action(TriageQueueAction::Select { id: RequestId::new(3) })
            .when_action(TriageQueueAction::Loaded {
                requests: vec![pending(1, 0), pending(2, 5)],
            })
            .then_state(|state| {
                assert_eq!(state.selected_id(), Some(RequestId::new(2)));
                assert_eq!(state.draft().answer, "draft 2");
            })
            .run();
    }
}
