//! Streamed `streamGenerateContent` strategy.

use super::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::client::GeminiClient;
use crate::error::{AssetGenError, Result};
use crate::strategy::{GenerationStrategy, StrategyKind};
use crate::types::{GenerationConfig, GenerationResponse, RequestPayload};
use async_trait::async_trait;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::StreamExt;
use std::time::Instant;

/// Sends the full payload and reads server-sent events until the first
/// chunk whose leading part carries image data. The rest of the stream is
/// dropped unread.
#[derive(Debug, Clone)]
pub struct StreamStrategy {
    client: GeminiClient,
}

impl StreamStrategy {
    /// Creates the strategy on top of a shared client.
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    fn finish(&self, mut response: GenerationResponse, start: Instant) -> GenerationResponse {
        response.model = Some(self.client.model().to_string());
        response.duration_ms = Some(start.elapsed().as_millis() as u64);
        response
    }
}

#[async_trait]
impl GenerationStrategy for StreamStrategy {
    async fn attempt_generate(
        &self,
        payload: &RequestPayload,
        config: &GenerationConfig,
    ) -> Result<GenerationResponse> {
        let start = Instant::now();
        let url = format!("{}?alt=sse", self.client.endpoint("streamGenerateContent"));
        let body = GenerateContentRequest::new(payload, config);

        let response = self.client.post_json(&url, &body).await?;
        let mut events = response.bytes_stream().eventsource();
        let mut seen = 0usize;

        while let Some(event) = events.next().await {
            let event = event.map_err(stream_error)?;
            if event.data.is_empty() {
                continue;
            }
            seen += 1;
            if let Some(found) = usable_chunk(&event.data)? {
                tracing::debug!(chunks = seen, "image chunk received, closing stream");
                return Ok(self.finish(found, start));
            }
        }

        tracing::debug!(chunks = seen, "stream ended without image data");
        Ok(self.finish(GenerationResponse::default(), start))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Stream
    }
}

/// Returns the chunk as a response if its first candidate leads with image
/// data. Chunks that are not valid JSON are skipped.
fn usable_chunk(data: &str) -> Result<Option<GenerationResponse>> {
    let chunk: GenerateContentResponse = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::debug!("skipping unparseable stream chunk: {e}");
            return Ok(None);
        }
    };
    chunk.check_blocked()?;
    if !chunk.leads_with_image() {
        return Ok(None);
    }
    chunk.into_response().map(Some)
}

fn stream_error(err: EventStreamError<reqwest::Error>) -> AssetGenError {
    match err {
        EventStreamError::Transport(e) => AssetGenError::Network(e),
        other => AssetGenError::Decode(format!("event stream: {other}")),
    }
}
