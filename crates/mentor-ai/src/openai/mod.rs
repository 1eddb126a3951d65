//! OpenAI Chat Completions gateway.
//!
//! Implements `CompletionGateway` against `POST {api_base}/v1/chat/completions`
//! with bearer authentication. Generation parameters come from
//! `OpenAiConfig` and are identical for every call.

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
