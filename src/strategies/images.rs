//! Dedicated image-generation (`predict`) strategy.

use crate::client::GeminiClient;
use crate::error::{AssetGenError, Result};
use crate::strategy::{GenerationStrategy, StrategyKind};
use crate::types::{
    Candidate, GenerationConfig, GenerationResponse, InlineData, RequestPayload, ResponsePart,
};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Sends only the text prompt, with image count and aspect ratio, and reads
/// back a list of generated images. Reference images are not sent.
#[derive(Debug, Clone)]
pub struct ImagesStrategy {
    client: GeminiClient,
}

impl ImagesStrategy {
    /// Creates the strategy on top of a shared client.
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenerationStrategy for ImagesStrategy {
    async fn attempt_generate(
        &self,
        payload: &RequestPayload,
        config: &GenerationConfig,
    ) -> Result<GenerationResponse> {
        let start = Instant::now();
        let body = PredictRequest::new(payload, config)?;
        let url = self.client.endpoint("predict");

        if payload.reference_count() > 0 {
            tracing::debug!(
                references = payload.reference_count(),
                "image generation call ignores reference images"
            );
        }

        let response = self.client.post_json(&url, &body).await?;
        let predict: PredictResponse = GeminiClient::read_json(response).await?;

        let mut result = predict.into_response()?;
        result.model = Some(self.client.model().to_string());
        result.duration_ms = Some(start.elapsed().as_millis() as u64);
        Ok(result)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Images
    }

    fn sends_references(&self) -> bool {
        false
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<&'static str>,
}

impl PredictRequest {
    fn new(payload: &RequestPayload, config: &GenerationConfig) -> Result<Self> {
        let prompt = payload
            .prompt()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AssetGenError::InvalidRequest("image generation needs a prompt".into()))?;

        Ok(Self {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: config.number_of_images.unwrap_or(1),
                aspect_ratio: config.aspect_ratio.map(|r| r.as_str()),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl PredictResponse {
    /// Each prediction becomes a single-part candidate.
    fn into_response(self) -> Result<GenerationResponse> {
        let candidates = self
            .predictions
            .into_iter()
            .map(|prediction| -> Result<Candidate> {
                let inline_data = match prediction.bytes_base64_encoded {
                    Some(encoded) => Some(InlineData {
                        mime_type: prediction
                            .mime_type
                            .unwrap_or_else(|| "image/png".to_string()),
                        data: base64::engine::general_purpose::STANDARD
                            .decode(encoded.as_bytes())
                            .map_err(|e| AssetGenError::Decode(e.to_string()))?,
                    }),
                    None => None,
                };
                Ok(Candidate {
                    parts: vec![ResponsePart {
                        inline_data,
                        text: None,
                    }],
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationResponse {
            candidates,
            ..Default::default()
        })
    }
}
