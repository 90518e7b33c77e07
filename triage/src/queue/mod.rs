//! The operator's triage queue.
//!
//! [`TriageQueueReducer`] keeps the pending list, the selection and the
//! uncommitted edit buffer. Commits leave the reducer as effects and come back
//! as `Committed`/`Rejected` feedback; [`TriageSession`] runs that loop.

mod actions;
mod reducer;
mod session;
mod types;

pub use actions::TriageQueueAction;
pub use reducer::{QueueEnvironment, TriageQueueReducer};
pub use session::TriageSession;
pub use types::{DraftBuffer, TriageQueueState};
