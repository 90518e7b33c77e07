//! State types for the triage queue.

use crate::error::TriageError;
use crate::types::{Request, RequestId, newest_first};

/// The operator's uncommitted edit of the selected request.
///
/// Lives only in the queue; it reaches the canonical record when the operator
/// submits, and is dropped when another request is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftBuffer {
    /// Answer text being edited
    pub answer: String,
    /// Internal notes being edited
    pub notes: String,
}

impl DraftBuffer {
    /// Fresh buffer for `request`, seeded with its AI draft
    #[must_use]
    pub fn seeded_from(request: &Request) -> Self {
        Self {
            answer: request.ai_draft_answer.clone(),
            notes: String::new(),
        }
    }

    /// Notes as the lifecycle expects them: `None` when blank
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        Some(self.notes.as_str()).filter(|n| !n.trim().is_empty())
    }
}

/// State of one operator's triage queue
#[derive(Clone, Debug, Default)]
pub struct TriageQueueState {
    /// Pending requests, newest first
    pending: Vec<Request>,
    /// Currently selected request
    selected: Option<RequestId>,
    /// Edit buffer of the selected request
    draft: DraftBuffer,
    /// Request whose commit is in progress
    in_flight: Option<RequestId>,
    /// Most recent rejection, cleared by the next operator intent
    pub last_error: Option<TriageError>,
    /// Most recently committed request
    pub last_committed: Option<Request>,
}

impl TriageQueueState {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue over `requests`; non-pending ones are ignored
    #[must_use]
    pub fn with_requests(requests: impl IntoIterator<Item = Request>) -> Self {
        let mut state = Self::new();
        state.replace_pending(requests.into_iter().collect());
        state
    }

    /// Pending requests, newest first
    #[must_use]
    pub fn pending(&self) -> &[Request] {
        &self.pending
    }

    /// Number of pending requests
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Id of the selected request
    #[must_use]
    pub const fn selected_id(&self) -> Option<RequestId> {
        self.selected
    }

    /// The selected request
    #[must_use]
    pub fn selected(&self) -> Option<&Request> {
        self.selected.and_then(|id| self.get(id))
    }

    /// The edit buffer
    #[must_use]
    pub const fn draft(&self) -> &DraftBuffer {
        &self.draft
    }

    /// Request whose commit is in progress
    #[must_use]
    pub const fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// Look up a pending request
    #[must_use]
    pub fn get(&self, id: RequestId) -> Option<&Request> {
        self.pending.iter().find(|r| r.id == id)
    }

    pub(crate) fn draft_mut(&mut self) -> &mut DraftBuffer {
        &mut self.draft
    }

    pub(crate) const fn set_in_flight(&mut self, id: Option<RequestId>) {
        self.in_flight = id;
    }

    /// Select `id` with a fresh buffer, or clear the selection
    pub(crate) fn select(&mut self, id: Option<RequestId>) {
        self.selected = id;
        self.draft = self
            .selected()
            .map(DraftBuffer::seeded_from)
            .unwrap_or_default();
    }

    /// Replace the pending set, keeping the selection (and its buffer) if it survived
    pub(crate) fn replace_pending(&mut self, mut requests: Vec<Request>) {
        requests.retain(Request::is_pending);
        requests.sort_by(newest_first);

        let fallback = self
            .selected
            .filter(|id| !requests.iter().any(|r| r.id == *id))
            .and_then(|id| self.pending.iter().position(|r| r.id == id));

        self.pending = requests;

        if let Some(position) = fallback {
            self.select(self.neighbour_of(position));
        }
    }

    /// Drop `id` from the queue; a selection on it falls back to its neighbour
    pub(crate) fn remove(&mut self, id: RequestId) {
        let Some(position) = self.pending.iter().position(|r| r.id == id) else {
            return;
        };
        self.pending.remove(position);

        if self.selected == Some(id) {
            self.select(self.neighbour_of(position));
        }
    }

    /// The item now at `position`, else the last one, else none
    fn neighbour_of(&self, position: usize) -> Option<RequestId> {
        self.pending
            .get(position)
            .or_else(|| self.pending.last())
            .map(|r| r.id)
    }
}
