//! Session states, outcomes and rejection reasons.

use serde::Serialize;

use crate::prompt::PromptError;
use crate::turn::Turn;
use crate::FailureKind;

/// Assistant text recorded when a completion fails. Provider details are
/// logged, never shown.
pub const FAILURE_NOTICE: &str = "Error getting response. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    AwaitingReply,
}

/// Why a submission was refused. A refused submission leaves the session
/// untouched and never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("missing problem context: {0}")]
    MissingContext(String),
    #[error("a reply is already pending")]
    Busy,
}

impl From<PromptError> for SubmitError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::MissingContext(detail) => SubmitError::MissingContext(detail),
        }
    }
}

/// How an accepted submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant reply was appended.
    Replied(Turn),
    /// The call failed and the fixed notice was appended in its place.
    Failed { kind: FailureKind, notice: Turn },
    /// The session was reset while the call was in flight; nothing was appended.
    Discarded,
}

impl TurnOutcome {
    /// The turn this outcome appended, if any.
    pub fn appended(&self) -> Option<&Turn> {
        match self {
            TurnOutcome::Replied(turn) => Some(turn),
            TurnOutcome::Failed { notice, .. } => Some(notice),
            TurnOutcome::Discarded => None,
        }
    }
}
