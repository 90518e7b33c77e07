//! Drives a [`TriageQueueReducer`] against a live [`LifecycleManager`].

use super::{QueueEnvironment, TriageQueueAction, TriageQueueReducer, TriageQueueState};
use crate::error::Result;
use crate::types::{Request, RequestId, RequestStatus};
use futures::future::{BoxFuture, FutureExt, join_all};
use helpdesk_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;

/// One operator's working session over the pending queue.
///
/// Actions are reduced in order; every effect they return is awaited and the
/// feedback actions are reduced in turn until the queue is quiet. Each method
/// therefore returns only once the commit it started has been settled.
pub struct TriageSession {
    reducer: TriageQueueReducer,
    state: TriageQueueState,
    env: QueueEnvironment,
}

impl TriageSession {
    /// Start a session with an empty queue; call [`Self::refresh`] to load it
    #[must_use]
    pub fn new(env: QueueEnvironment) -> Self {
        Self {
            reducer: TriageQueueReducer::new(),
            state: TriageQueueState::new(),
            env,
        }
    }

    /// Current queue state
    #[must_use]
    pub const fn state(&self) -> &TriageQueueState {
        &self.state
    }

    /// Reload the pending requests from the store.
    ///
    /// # Errors
    ///
    /// Store failures, converted to [`crate::error::TriageError`].
    pub async fn refresh(&mut self) -> Result<()> {
        let requests = self
            .env
            .lifecycle
            .store()
            .list(Some(RequestStatus::Pending))
            .await?;
        tracing::debug!(pending = requests.len(), "Triage queue refreshed");
        self.send(TriageQueueAction::Loaded { requests }).await;
        Ok(())
    }

    /// Select a pending request.
    ///
    /// # Errors
    ///
    /// [`crate::error::TriageError::NotFound`] if `id` is not in the queue.
    pub async fn select(&mut self, id: RequestId) -> Result<()> {
        self.send(TriageQueueAction::Select { id }).await;
        self.outcome()
    }

    /// Replace the answer in the edit buffer
    pub async fn set_draft_answer(&mut self, text: impl Into<String>) {
        self.send(TriageQueueAction::EditAnswer { text: text.into() }).await;
    }

    /// Replace the notes in the edit buffer
    pub async fn set_draft_notes(&mut self, text: impl Into<String>) {
        self.send(TriageQueueAction::EditNotes { text: text.into() }).await;
    }

    /// Approve the selected request's AI draft.
    ///
    /// Returns `Ok(None)` when nothing is selected.
    ///
    /// # Errors
    ///
    /// Whatever the lifecycle refused the commit with.
    pub async fn approve_selected(&mut self) -> Result<Option<Request>> {
        self.commit(TriageQueueAction::ApproveSelected).await
    }

    /// Send the edit buffer's answer for the selected request.
    ///
    /// Returns `Ok(None)` when nothing is selected.
    ///
    /// # Errors
    ///
    /// [`crate::error::TriageError::EmptyAnswer`] for a blank buffer, or
    /// whatever the lifecycle refused the commit with.
    pub async fn submit_selected(&mut self) -> Result<Option<Request>> {
        self.commit(TriageQueueAction::SubmitSelected).await
    }

    async fn commit(&mut self, action: TriageQueueAction) -> Result<Option<Request>> {
        self.state.last_committed = None;
        self.send(action).await;
        self.outcome()?;
        Ok(self.state.last_committed.clone())
    }

    fn outcome(&self) -> Result<()> {
        self.state.last_error.clone().map_or(Ok(()), Err)
    }

    /// Reduce `action` and everything its effects feed back
    pub async fn send(&mut self, action: TriageQueueAction) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            let effects = self.reducer.reduce(&mut self.state, action, &self.env);
            for effect in effects {
                queue.extend(run_effect(effect).await);
            }
        }
    }
}

/// Execute an effect description and collect the actions it feeds back
fn run_effect<A: Send + 'static>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>> {
    async move {
        match effect {
            Effect::None => Vec::new(),
            Effect::Future(fut) => fut.await.into_iter().collect(),
            Effect::Parallel(effects) => join_all(effects.into_iter().map(run_effect))
                .await
                .into_iter()
                .flatten()
                .collect(),
            Effect::Sequential(effects) => {
                let mut actions = Vec::new();
                for effect in effects {
                    actions.extend(run_effect(effect).await);
                }
                actions
            },
        }
    }
    .boxed()
}
