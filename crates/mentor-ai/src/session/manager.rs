//! SessionController struct, observers and reset.

use std::sync::Arc;

use mentor_common::SessionId;
use tokio::sync::{watch, RwLock};
use tracing::info;

use crate::prompt::PromptBuilder;
use crate::store::MessageStore;
use crate::token_tracker::TokenTracker;
use crate::turn::Turn;
use crate::CompletionGateway;

use super::types::SessionStatus;

/// Mutable session state. Guarded by a single lock that is never held
/// across a gateway call.
pub(super) struct SessionState {
    pub(super) session_id: SessionId,
    pub(super) store: MessageStore,
    pub(super) status: SessionStatus,
    /// Bumped by every reset. Pending turns carry the epoch they started in.
    pub(super) epoch: u64,
    pub(super) tracker: TokenTracker,
}

/// The one active tutoring session of a client context.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    pub(super) state: Arc<RwLock<SessionState>>,
    pub(super) gateway: Arc<dyn CompletionGateway>,
    pub(super) builder: PromptBuilder,
    pub(super) status_tx: Arc<watch::Sender<SessionStatus>>,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Idle);
        Self {
            state: Arc::new(RwLock::new(SessionState {
                session_id: SessionId::new(),
                store: MessageStore::new(),
                status: SessionStatus::Idle,
                epoch: 0,
                tracker: TokenTracker::new(),
            })),
            gateway,
            builder: PromptBuilder::new(),
            status_tx: Arc::new(status_tx),
        }
    }

    pub fn with_prompt_builder(mut self, builder: PromptBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Owned copy of the transcript.
    pub async fn snapshot(&self) -> Vec<Turn> {
        self.state.read().await.store.snapshot()
    }

    pub fn status(&self) -> SessionStatus {
        *self.status_tx.borrow()
    }

    /// Watch status transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    pub async fn epoch(&self) -> u64 {
        self.state.read().await.epoch
    }

    pub async fn session_id(&self) -> SessionId {
        self.state.read().await.session_id
    }

    /// Token usage accumulated since the last reset.
    pub async fn usage(&self) -> TokenTracker {
        self.state.read().await.tracker.clone()
    }

    /// Start a new conversation: clear the transcript, return to `Idle` and
    /// orphan any in-flight reply. Allowed from any state.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let was = state.status;
        state.store.clear();
        state.tracker.reset();
        state.epoch += 1;
        state.session_id = SessionId::new();
        self.set_status(&mut state, SessionStatus::Idle);
        info!(
            session = %state.session_id,
            epoch = state.epoch,
            was_awaiting = (was == SessionStatus::AwaitingReply),
            "Session reset"
        );
    }

    pub(super) fn set_status(&self, state: &mut SessionState, status: SessionStatus) {
        state.status = status;
        self.status_tx.send_replace(status);
    }
}
