//! The transition table.
//!
//! Every legal `(status, action)` pair is listed in [`RequestStatus::next`];
//! every other pair is an `InvalidTransition`. Nothing else in the crate
//! compares statuses to decide whether a move is allowed.

use crate::types::RequestStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lifecycle move, as seen by the transition table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Intake hands a `NEW` request to the queue
    Intake,
    /// Operator accepts the AI draft
    Approve,
    /// Operator submits their own answer
    EditAndSend,
    /// The answer goes out
    Send,
    /// A sent request leaves the working set
    Archive,
}

impl LifecycleAction {
    /// Name used in errors and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Approve => "approve",
            Self::EditAndSend => "edit_and_send",
            Self::Send => "send",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RequestStatus {
    /// The state reached by applying `action`, or `None` if the move is illegal
    #[must_use]
    pub const fn next(self, action: LifecycleAction) -> Option<Self> {
        match (self, action) {
            (Self::New, LifecycleAction::Intake) => Some(Self::Pending),
            (Self::Pending, LifecycleAction::Approve) => Some(Self::Approved),
            (Self::Pending, LifecycleAction::EditAndSend) => Some(Self::Edited),
            (Self::Approved | Self::Edited, LifecycleAction::Send) => Some(Self::Sent),
            (Self::Sent, LifecycleAction::Archive) => Some(Self::Closed),
            _ => None,
        }
    }

    /// Whether no action is accepted any more
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}
