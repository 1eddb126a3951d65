//! CompletionGateway implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::prompt::CompletionRequest;
use crate::{Completion, CompletionGateway, GatewayError};

use super::client::{classify_status, classify_transport, OpenAiClient};

#[async_trait]
impl CompletionGateway for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        Self::check_request(request)?;
        let body = self.build_request_body(request);

        debug!(
            model = %self.config.model,
            messages = request.history.len(),
            "OpenAI API request"
        );

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = classify_status(status, &text);
            warn!(%status, kind = ?err.kind(), "OpenAI API returned an error");
            return Err(err);
        }

        let text = response.text().await.map_err(|e| classify_transport(&e))?;
        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| GatewayError::MalformedResponse(format!("invalid JSON body: {e}")))?;

        let completion = self.parse_response(&json)?;
        debug!(
            model = %completion.model,
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "OpenAI API response"
        );
        Ok(completion)
    }
}
