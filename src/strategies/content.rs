//! Single-shot multimodal `generateContent` strategy.

use super::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::client::GeminiClient;
use crate::error::Result;
use crate::strategy::{GenerationStrategy, StrategyKind};
use crate::types::{GenerationConfig, GenerationResponse, RequestPayload};
use async_trait::async_trait;
use std::time::Instant;

/// Sends the full payload (references and prompt) in one request and reads
/// one response object.
#[derive(Debug, Clone)]
pub struct ContentStrategy {
    client: GeminiClient,
}

impl ContentStrategy {
    /// Creates the strategy on top of a shared client.
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenerationStrategy for ContentStrategy {
    async fn attempt_generate(
        &self,
        payload: &RequestPayload,
        config: &GenerationConfig,
    ) -> Result<GenerationResponse> {
        let start = Instant::now();
        let url = self.client.endpoint("generateContent");
        let body = GenerateContentRequest::new(payload, config);

        tracing::debug!(
            model = %self.client.model(),
            references = payload.reference_count(),
            "sending generateContent request"
        );

        let response = self.client.post_json(&url, &body).await?;
        let gemini_response: GenerateContentResponse =
            GeminiClient::read_json(response).await?;
        gemini_response.check_blocked()?;

        let mut result = gemini_response.into_response()?;
        result.model = Some(self.client.model().to_string());
        result.duration_ms = Some(start.elapsed().as_millis() as u64);
        Ok(result)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Content
    }
}
