//! Mapping of request and provider failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mentor_ai::{FailureKind, GatewayError, PromptError};

use crate::protocol::ErrorEnvelope;

pub const PROCESSING_FAILED: &str = "Failed to process request";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    MissingContext(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<PromptError> for ApiError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::MissingContext(detail) => ApiError::MissingContext(detail),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::MissingContext(_) => StatusCode::BAD_REQUEST,
            ApiError::Gateway(err) => match err.kind() {
                FailureKind::AuthFailure | FailureKind::MalformedResponse => StatusCode::BAD_GATEWAY,
                FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                FailureKind::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                FailureKind::InvalidRequest => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "Invalid request",
            ApiError::MissingContext(_) => "Missing problem context",
            ApiError::Gateway(_) => PROCESSING_FAILED,
        }
    }

    /// Client-facing detail. Provider failures only name their kind; the
    /// upstream body stays in the server log.
    pub fn details(&self) -> String {
        match self {
            ApiError::InvalidRequest(detail) | ApiError::MissingContext(detail) => detail.clone(),
            ApiError::Gateway(err) => match err.kind() {
                FailureKind::AuthFailure => "completion provider rejected the credentials",
                FailureKind::RateLimited => "completion provider rate limit reached",
                FailureKind::ProviderUnavailable => "completion provider unavailable",
                FailureKind::MalformedResponse => "completion provider returned an unusable reply",
                FailureKind::InvalidRequest => "request could not be sent to the provider",
            }
            .to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: self.label().to_string(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_kinds_map_to_statuses() {
        let cases = [
            (GatewayError::AuthFailure("x".into()), StatusCode::BAD_GATEWAY),
            (GatewayError::RateLimited("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (
                GatewayError::ProviderUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (GatewayError::MalformedResponse("x".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn input_problems_are_bad_requests() {
        assert_eq!(
            ApiError::InvalidRequest("empty".into()).status(),
            StatusCode::BAD_REQUEST
        );
        let err = ApiError::from(PromptError::MissingContext("no url".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.label(), "Missing problem context");
        assert_eq!(err.details(), "no url");
    }

    #[test]
    fn provider_details_do_not_echo_upstream_body() {
        let body = r#"HTTP 401: {"error":{"message":"Incorrect API key provided: sk-abc123"}}"#;
        let err = ApiError::from(GatewayError::AuthFailure(body.into()));
        let details = err.details();
        assert!(!details.contains("sk-abc123"));
        assert!(!details.contains("HTTP 401"));
        assert_eq!(details, "completion provider rejected the credentials");
    }
}
