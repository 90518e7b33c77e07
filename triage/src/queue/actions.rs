//! Actions for the triage queue reducer.

use crate::error::TriageError;
use crate::types::{Request, RequestId};

/// Everything the triage queue reacts to.
#[derive(Clone, Debug)]
pub enum TriageQueueAction {
    // ========================================================================
    // Operator intents
    // ========================================================================
    /// Replace the queue contents with a fresh read of the store
    Loaded {
        /// Requests read from the store; non-pending ones are dropped
        requests: Vec<Request>,
    },

    /// Select a request; a different selection discards the edit buffer
    Select {
        /// Request to select
        id: RequestId,
    },

    /// Clear the selection and the edit buffer
    ClearSelection,

    /// Replace the answer text in the edit buffer
    EditAnswer {
        /// New answer text
        text: String,
    },

    /// Replace the internal notes in the edit buffer
    EditNotes {
        /// New notes text
        text: String,
    },

    /// Approve and send the AI draft of the selected request
    ApproveSelected,

    /// Send the edit buffer's answer for the selected request
    SubmitSelected,

    // ========================================================================
    // Feedback from commit effects
    // ========================================================================
    /// A commit went through; the request left `PENDING`
    Committed {
        /// The closed record as saved
        request: Request,
    },

    /// A commit was refused
    Rejected {
        /// Request the commit targeted
        id: RequestId,
        /// Why it was refused
        error: TriageError,
    },
}
