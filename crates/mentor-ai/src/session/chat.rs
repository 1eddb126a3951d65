//! Submitting turns and applying completion results.

use std::fmt;

use tracing::{debug, warn};

use crate::prompt::{CompletionRequest, PromptBuilder};
use crate::turn::Turn;
use crate::{Completion, FailureKind, GatewayError};

use super::manager::{SessionController, SessionState};
use super::types::{SessionStatus, SubmitError, TurnOutcome, FAILURE_NOTICE};

/// An accepted submission whose reply has not been applied yet.
///
/// The user turn is already in the transcript and the session is
/// `AwaitingReply`. Dropping this without calling `complete` settles the turn
/// with the failure notice so the session never stays busy.
#[must_use = "the session stays AwaitingReply until the pending turn completes"]
pub struct PendingTurn {
    controller: SessionController,
    request: CompletionRequest,
    epoch: u64,
    settled: bool,
}

impl PendingTurn {
    pub fn request(&self) -> &CompletionRequest {
        &self.request
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Make the single gateway call and apply its result.
    pub async fn complete(mut self) -> TurnOutcome {
        let result = self.controller.gateway.complete(&self.request).await;
        let outcome = self.controller.apply(self.epoch, result).await;
        self.settled = true;
        outcome
    }
}

impl fmt::Debug for PendingTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTurn")
            .field("epoch", &self.epoch)
            .field("history", &self.request.history.len())
            .field("settled", &self.settled)
            .finish()
    }
}

impl Drop for PendingTurn {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let abandoned = || GatewayError::ProviderUnavailable("request abandoned".into());

        if let Ok(mut state) = self.controller.state.try_write() {
            self.controller.settle(&mut state, self.epoch, Err(abandoned()));
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let controller = self.controller.clone();
                let epoch = self.epoch;
                handle.spawn(async move {
                    controller.apply(epoch, Err(abandoned())).await;
                });
            }
            Err(_) => warn!(
                epoch = self.epoch,
                "Pending turn dropped outside a runtime; session stays busy until reset"
            ),
        }
    }
}

impl SessionController {
    /// Validate and accept a submission.
    ///
    /// Rejections are checked in order: `Busy`, then `InvalidInput` for empty
    /// text, then `MissingContext` for an unusable problem URL. On acceptance
    /// the user turn is appended and the session becomes `AwaitingReply`.
    pub async fn begin_turn(
        &self,
        text: impl Into<String>,
        problem_ref: &str,
    ) -> Result<PendingTurn, SubmitError> {
        let text = text.into();
        let mut state = self.state.write().await;

        if state.status == SessionStatus::AwaitingReply {
            return Err(SubmitError::Busy);
        }
        if text.trim().is_empty() {
            return Err(SubmitError::InvalidInput("message text is empty".into()));
        }
        let problem_ref = PromptBuilder::validate_problem_ref(problem_ref)?;

        let turn = Turn::user(text, problem_ref);
        let mut turns = state.store.snapshot();
        turns.push(turn.clone());
        let request = self.builder.build(&turns, problem_ref)?;

        state
            .store
            .append(turn)
            .map_err(|e| SubmitError::InvalidInput(e.to_string()))?;
        self.set_status(&mut state, SessionStatus::AwaitingReply);

        debug!(
            session = %state.session_id,
            epoch = state.epoch,
            history = request.history.len(),
            "Turn accepted"
        );

        Ok(PendingTurn {
            controller: self.clone(),
            request,
            epoch: state.epoch,
            settled: false,
        })
    }

    /// Submit a turn and wait for its outcome.
    pub async fn submit_turn(
        &self,
        text: impl Into<String>,
        problem_ref: &str,
    ) -> Result<TurnOutcome, SubmitError> {
        let pending = self.begin_turn(text, problem_ref).await?;
        Ok(pending.complete().await)
    }

    pub(super) async fn apply(
        &self,
        epoch: u64,
        result: Result<Completion, GatewayError>,
    ) -> TurnOutcome {
        let mut state = self.state.write().await;
        self.settle(&mut state, epoch, result)
    }

    /// Record a completion result. Results from an older epoch are dropped.
    pub(super) fn settle(
        &self,
        state: &mut SessionState,
        epoch: u64,
        result: Result<Completion, GatewayError>,
    ) -> TurnOutcome {
        if state.epoch != epoch {
            warn!(
                reply_epoch = epoch,
                current_epoch = state.epoch,
                "Discarding reply for a reset session"
            );
            return TurnOutcome::Discarded;
        }

        let outcome = match result {
            Ok(completion) => {
                state.tracker.record(&completion.model, &completion.usage);
                match state.store.append(Turn::assistant(completion.text)) {
                    Ok(stored) => TurnOutcome::Replied(stored.clone()),
                    Err(e) => {
                        warn!(error = %e, "Completion text rejected by the store");
                        TurnOutcome::Failed {
                            kind: FailureKind::MalformedResponse,
                            notice: push_notice(state),
                        }
                    }
                }
            }
            Err(err) => {
                warn!(kind = ?err.kind(), detail = err.detail(), "Completion failed");
                TurnOutcome::Failed {
                    kind: err.kind(),
                    notice: push_notice(state),
                }
            }
        };

        self.set_status(state, SessionStatus::Idle);
        outcome
    }
}

fn push_notice(state: &mut SessionState) -> Turn {
    let notice = Turn::assistant(FAILURE_NOTICE);
    match state.store.append(notice.clone()) {
        Ok(stored) => stored.clone(),
        Err(e) => {
            warn!(error = %e, "Failed to record failure notice");
            notice
        }
    }
}
