//! Request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use mentor_ai::{CompletionGateway, MessageStore, PromptBuilder, TokenTracker, Turn};
use mentor_common::new_correlation_id;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::protocol::{ChatReply, ChatRequest, WireMessage};

/// Shared state of the HTTP server.
pub struct ServerState {
    pub gateway: Arc<dyn CompletionGateway>,
    pub builder: PromptBuilder,
    /// Usage across every request served by this process.
    pub usage: Mutex<TokenTracker>,
}

impl ServerState {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self {
            gateway,
            builder: PromptBuilder::new(),
            usage: Mutex::new(TokenTracker::new()),
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mentor-server",
    }))
}

/// `POST /api/chat`: one completion for the posted conversation.
pub async fn chat(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let request_id = new_correlation_id();
    let turns = transcript(&request.messages, &request.problem_url)?;
    let completion_request = state.builder.build(&turns, &request.problem_url)?;

    debug!(
        request_id = %request_id,
        turns = turns.len(),
        problem = %request.problem_url.trim(),
        "Chat request"
    );

    let completion = state
        .gateway
        .complete(&completion_request)
        .await
        .map_err(|e| {
            warn!(request_id = %request_id, kind = ?e.kind(), error = %e, "Completion failed");
            ApiError::from(e)
        })?;

    let mut usage = state.usage.lock().await;
    usage.record(&completion.model, &completion.usage);
    debug!(
        request_id = %request_id,
        calls = usage.call_count(),
        total_tokens = usage.total_tokens(),
        "Chat reply"
    );

    Ok(Json(ChatReply {
        reply: completion.text,
    }))
}

/// Rebuild the posted conversation as turns. The list must be non-empty,
/// every message must carry text, and the last one must come from the user.
pub(crate) fn transcript(messages: &[WireMessage], problem_url: &str) -> Result<Vec<Turn>, ApiError> {
    match messages.last() {
        None => return Err(ApiError::InvalidRequest("messages is empty".into())),
        Some(last) if last.is_bot => {
            return Err(ApiError::InvalidRequest(
                "the last message must come from the user".into(),
            ))
        }
        Some(_) => {}
    }

    let problem_ref = problem_url.trim();
    let mut store = MessageStore::new();
    for (index, message) in messages.iter().enumerate() {
        let turn = if message.is_bot {
            Turn::assistant(message.content.as_str())
        } else {
            Turn::user(message.content.as_str(), problem_ref)
        };
        store
            .append(turn)
            .map_err(|e| ApiError::InvalidRequest(format!("message {index}: {e}")))?;
    }
    Ok(store.snapshot())
}
