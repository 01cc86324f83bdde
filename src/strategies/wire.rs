//! `generateContent` wire types, shared by the single-shot and streamed
//! strategies.

use crate::error::{AssetGenError, Result};
use crate::types::{
    Candidate, GenerationConfig, GenerationResponse, InlineData, Modality, Part, RequestPayload,
    ResponsePart,
};
use base64::Engine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest {
    contents: Vec<WireContent>,
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize)]
struct WireContent {
    role: &'static str,
    parts: Vec<WireRequestPart>,
}

/// A part in a request - text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: WireInlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    response_modalities: Vec<Modality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<WireImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireImageConfig {
    aspect_ratio: &'static str,
}

impl GenerateContentRequest {
    pub(super) fn new(payload: &RequestPayload, config: &GenerationConfig) -> Self {
        let parts = payload
            .parts()
            .iter()
            .map(|part| match part {
                Part::Text(text) => WireRequestPart::Text { text: text.clone() },
                Part::InlineData { mime_type, data } => WireRequestPart::InlineData {
                    inline_data: WireInlineData {
                        mime_type: mime_type.clone(),
                        data: base64::engine::general_purpose::STANDARD.encode(data),
                    },
                },
            })
            .collect();

        Self {
            contents: vec![WireContent {
                role: payload.role(),
                parts,
            }],
            generation_config: WireGenerationConfig {
                response_modalities: config.response_modalities.clone(),
                temperature: config.temperature,
                image_config: config.aspect_ratio.map(|ratio| WireImageConfig {
                    aspect_ratio: ratio.as_str(),
                }),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireContentResponse {
    #[serde(default)]
    parts: Vec<WirePartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePartResponse {
    #[serde(default)]
    inline_data: Option<WireInlineData>,
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Fails on a blocked prompt or a safety finish reason on any candidate.
    pub(super) fn check_blocked(&self) -> Result<()> {
        if let Some(ref feedback) = self.prompt_feedback {
            if let Some(ref reason) = feedback.block_reason {
                let msg = feedback
                    .block_reason_message
                    .clone()
                    .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
                return Err(AssetGenError::ContentBlocked(msg));
            }
        }

        for finish_reason in self.candidates.iter().filter_map(|c| c.finish_reason.as_deref()) {
            match finish_reason {
                "SAFETY"
                | "IMAGE_SAFETY"
                | "IMAGE_PROHIBITED_CONTENT"
                | "PROHIBITED_CONTENT"
                | "BLOCKLIST" => {
                    return Err(AssetGenError::ContentBlocked(format!(
                        "Content blocked by Gemini safety filter: {}",
                        finish_reason
                    )));
                }
                _ => {} // STOP, MAX_TOKENS, NO_IMAGE etc. fall through to the writer
            }
        }

        Ok(())
    }

    /// True when the first part of the first candidate carries image data.
    pub(super) fn leads_with_image(&self) -> bool {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.inline_data.as_ref())
            .is_some_and(|d| !d.data.is_empty())
    }

    /// Decodes inline data and normalizes into a [`GenerationResponse`].
    pub(super) fn into_response(self) -> Result<GenerationResponse> {
        let candidates = self
            .candidates
            .into_iter()
            .map(|candidate| -> Result<Candidate> {
                let parts = candidate
                    .content
                    .map(|c| c.parts)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|part| -> Result<ResponsePart> {
                        let inline_data = part.inline_data.map(decode_inline).transpose()?;
                        Ok(ResponsePart {
                            inline_data,
                            text: part.text,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Candidate { parts })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationResponse {
            candidates,
            ..Default::default()
        })
    }
}

fn decode_inline(inline: WireInlineData) -> Result<InlineData> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| AssetGenError::Decode(e.to_string()))?;
    Ok(InlineData {
        mime_type: inline.mime_type,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::AssetRequestBuilder;
    use crate::types::AspectRatio;

    #[test]
    fn test_request_serialization() {
        let payload =
            AssetRequestBuilder::new("S: ").build_from_bytes("a puppy", vec![b"PNG".to_vec()]);
        let config = GenerationConfig::new().with_temperature(0.4);
        let json = serde_json::to_value(GenerateContentRequest::new(&payload, &config)).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "UE5H");
        assert_eq!(parts[1]["text"], "S: a puppy");
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE"])
        );
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
        assert!(json["generationConfig"].get("imageConfig").is_none());
        assert!(json.get("generation_config").is_none());
    }

    #[test]
    fn test_request_with_aspect_ratio() {
        let payload = AssetRequestBuilder::default().build_from_bytes("x", vec![]);
        let config = GenerationConfig::new().with_aspect_ratio(AspectRatio::Portrait);
        let json = serde_json::to_value(GenerateContentRequest::new(&payload, &config)).unwrap();

        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "9:16");
        assert!(json["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_response_decoding() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here you go"},
                        {"inlineData": {"mimeType": "image/png", "data": "UE5HREFUQQ=="}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(resp.check_blocked().is_ok());
        assert!(!resp.leads_with_image());

        let response = resp.into_response().unwrap();
        assert_eq!(response.first_image().unwrap().data, b"PNGDATA");
        assert_eq!(response.text().as_deref(), Some("Here you go"));
    }

    #[test]
    fn test_response_invalid_base64() {
        let json = r#"{"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/png", "data": "***"}}
        ]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(resp.into_response(), Err(AssetGenError::Decode(_))));
    }

    #[test]
    fn test_prompt_feedback_block() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {
                "blockReason": "SAFETY",
                "blockReasonMessage": "Prompt was blocked due to safety"
            }
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        match resp.check_blocked() {
            Err(AssetGenError::ContentBlocked(msg)) => {
                assert_eq!(msg, "Prompt was blocked due to safety")
            }
            other => panic!("expected ContentBlocked, got {other:?}"),
        }
    }

    #[test]
    fn test_safety_finish_reason() {
        let json = r#"{"candidates": [{"finishReason": "IMAGE_SAFETY"}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            resp.check_blocked(),
            Err(AssetGenError::ContentBlocked(_))
        ));
    }

    #[test]
    fn test_no_image_finish_reason_is_not_an_error() {
        let json = r#"{"candidates": [{"finishReason": "NO_IMAGE"}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(resp.check_blocked().is_ok());
        assert!(resp.into_response().unwrap().first_image().is_none());
    }

    #[test]
    fn test_leads_with_image() {
        let json = r#"{"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/png", "data": "UE5H"}},
            {"text": "caption"}
        ]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(resp.leads_with_image());

        let empty = r#"{"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/png", "data": ""}}
        ]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(empty).unwrap();
        assert!(!resp.leads_with_image());
    }
}
