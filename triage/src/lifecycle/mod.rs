//! Request lifecycle management.
//!
//! ```text
//! intake ──► NEW ──► PENDING ──approve──────► APPROVED ─┐
//!                        │                              ├─send─► SENT ──► CLOSED
//!                        └────edit_and_send──► EDITED ──┘
//! ```
//!
//! - [`transitions`]: the single table of legal `(status, action)` moves
//! - [`commands`]: pure functions producing the next revision of a record
//! - [`LifecycleManager`]: runs commands against a [`crate::store::RequestStore`]
//!
//! `approve` and `edit_and_send` are atomic operator actions: the record goes
//! straight from `PENDING` to `CLOSED` with `responded_at` stamped, and no
//! intermediate state is ever saved.

pub mod commands;
pub mod manager;
#[cfg(test)]
mod tests;
pub mod transitions;

pub use manager::LifecycleManager;
pub use transitions::LifecycleAction;
