//! Turn-cycle orchestration for one tutoring session.
//!
//! A `SessionController` owns the transcript and moves between `Idle` and
//! `AwaitingReply`. Every submission is tagged with the session epoch; a
//! `reset` bumps the epoch so replies to the old conversation are dropped
//! instead of leaking into the new one.

mod chat;
mod manager;
mod types;

#[cfg(test)]
mod tests;

pub use chat::PendingTurn;
pub use manager::SessionController;
pub use types::{SessionStatus, SubmitError, TurnOutcome, FAILURE_NOTICE};
