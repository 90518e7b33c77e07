//! Error taxonomy of the triage engine.
//!
//! No error here is fatal: every variant is recoverable by re-prompting the
//! operator, re-fetching state or retrying.

use crate::lifecycle::LifecycleAction;
use crate::types::{RequestId, RequestStatus};
use thiserror::Error;

/// Errors surfaced by lifecycle, queue, archive and export operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriageError {
    /// The action is not legal in the request's current state; the record is unchanged
    #[error("Cannot {action} request {id} while it is {status}")]
    InvalidTransition {
        /// Request the action targeted
        id: RequestId,
        /// Status the request was in
        status: RequestStatus,
        /// Rejected action
        action: LifecycleAction,
    },

    /// An edited answer was blank or whitespace-only
    #[error("Answer text must not be empty")]
    EmptyAnswer,

    /// The id does not resolve in the request store
    #[error("Request {0} not found")]
    NotFound(RequestId),

    /// A concurrent change invalidated the precondition; reload and retry
    #[error("Request {0} was modified concurrently")]
    Conflict(RequestId),

    /// An intake payload violates the data model
    #[error("Invalid request record: {0}")]
    InvalidRecord(String),

    /// Serialization could not complete
    #[error("Export failed: {0}")]
    ExportFailure(String),
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, TriageError>;

/// Errors reported by a [`crate::store::RequestStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with this id
    #[error("Request {0} not found")]
    NotFound(RequestId),

    /// The stored revision does not match the one the caller started from
    #[error("Revision conflict on request {id}: stored version {stored}, incoming version {incoming}")]
    Conflict {
        /// Request being saved
        id: RequestId,
        /// Version currently in the store
        stored: u64,
        /// Version carried by the incoming record
        incoming: u64,
    },

    /// A record with this id already exists
    #[error("Request {0} already exists")]
    Duplicate(RequestId),
}

impl From<StoreError> for TriageError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Conflict { id, .. } | StoreError::Duplicate(id) => Self::Conflict(id),
        }
    }
}

impl From<csv::Error> for TriageError {
    fn from(error: csv::Error) -> Self {
        Self::ExportFailure(error.to_string())
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(error: serde_json::Error) -> Self {
        Self::ExportFailure(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_onto_taxonomy() {
        let id = RequestId::new(9);
        assert_eq!(TriageError::from(StoreError::NotFound(id)), TriageError::NotFound(id));
        assert_eq!(
            TriageError::from(StoreError::Conflict { id, stored: 3, incoming: 3 }),
            TriageError::Conflict(id)
        );
        assert_eq!(TriageError::from(StoreError::Duplicate(id)), TriageError::Conflict(id));
    }

    #[test]
    fn invalid_transition_message_names_action_and_state() {
        let error = TriageError::InvalidTransition {
            id: RequestId::new(4),
            status: RequestStatus::Closed,
            action: LifecycleAction::Approve,
        };
        assert_eq!(error.to_string(), "Cannot approve request 4 while it is CLOSED");
    }
}
