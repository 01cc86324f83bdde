//! Generation strategy trait and strategy selection.

use crate::client::GeminiClient;
use crate::error::Result;
use crate::strategies::{ContentStrategy, ImagesStrategy, StreamStrategy};
use crate::types::{GenerationConfig, GenerationResponse, RequestPayload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One way of asking the service for an image.
///
/// Implementations return `Ok` with a possibly image-less response when the
/// call itself succeeded; deciding whether that response is usable is left
/// to the caller.
#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    /// Sends `payload` with `config` and returns the service's response.
    async fn attempt_generate(
        &self,
        payload: &RequestPayload,
        config: &GenerationConfig,
    ) -> Result<GenerationResponse>;

    /// Returns the kind of this strategy.
    fn kind(&self) -> StrategyKind;

    /// Whether the payload's reference images go over the wire.
    fn sends_references(&self) -> bool {
        true
    }

    /// Returns the name of this strategy for display.
    fn name(&self) -> &str {
        match self.kind() {
            StrategyKind::Content => "multimodal generateContent",
            StrategyKind::Images => "dedicated image generation",
            StrategyKind::Stream => "streamed generateContent",
        }
    }
}

/// Strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Single-shot multimodal `generateContent` call.
    #[default]
    Content,
    /// Dedicated image-generation (`predict`) call, text prompt only.
    Images,
    /// Streamed `streamGenerateContent`, first usable chunk wins.
    Stream,
}

impl StrategyKind {
    /// All strategies, in declaration order.
    pub const ALL: [StrategyKind; 3] = [Self::Content, Self::Images, Self::Stream];

    /// Creates the strategy for this kind on top of `client`.
    pub fn into_strategy(self, client: GeminiClient) -> Box<dyn GenerationStrategy> {
        match self {
            Self::Content => Box::new(ContentStrategy::new(client)),
            Self::Images => Box::new(ImagesStrategy::new(client)),
            Self::Stream => Box::new(StreamStrategy::new(client)),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Images => write!(f, "images"),
            Self::Stream => write!(f, "stream"),
        }
    }
}
