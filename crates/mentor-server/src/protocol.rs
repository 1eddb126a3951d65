//! JSON bodies of the chat endpoint.

use serde::{Deserialize, Serialize};

/// `POST /api/chat` body: the whole conversation so far plus the problem URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, alias = "problemRef")]
    pub problem_url: String,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub content: String,
    #[serde(default)]
    pub is_bot: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: String,
}
