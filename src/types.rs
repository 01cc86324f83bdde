//! Core types shared by the request builder, strategies and writer.

use serde::{Deserialize, Serialize};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Maps a MIME type reported by the service back to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }
}

/// Aspect ratios accepted by the image models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square aspect ratio.
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape (widescreen) aspect ratio.
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 portrait (tall) aspect ratio.
    #[serde(rename = "9:16")]
    Portrait,
    /// 4:3 standard landscape aspect ratio.
    #[serde(rename = "4:3")]
    Standard,
    /// 3:4 standard portrait aspect ratio.
    #[serde(rename = "3:4")]
    StandardPortrait,
}

impl AspectRatio {
    /// Returns the aspect ratio as a string (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Standard => "4:3",
            Self::StandardPortrait => "3:4",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output modality requested from a multimodal model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Generated images.
    Image,
    /// Generated text.
    Text,
}

impl Modality {
    /// Returns the wire name of the modality.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Text => "TEXT",
        }
    }
}

/// Generation settings, constant across every job in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Modalities the model should respond with.
    #[serde(default = "default_modalities")]
    pub response_modalities: Vec<Modality>,
    /// Requested aspect ratio.
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Number of images, for the dedicated image-generation call.
    #[serde(default)]
    pub number_of_images: Option<u32>,
}

fn default_modalities() -> Vec<Modality> {
    vec![Modality::Image]
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            response_modalities: default_modalities(),
            aspect_ratio: None,
            temperature: None,
            number_of_images: None,
        }
    }
}

impl GenerationConfig {
    /// Creates a config requesting image output only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response modalities.
    pub fn with_modalities(mut self, modalities: impl Into<Vec<Modality>>) -> Self {
        self.response_modalities = modalities.into();
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the number of images to request.
    pub fn with_number_of_images(mut self, count: u32) -> Self {
        self.number_of_images = Some(count);
        self
    }
}

/// One unit of request content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Raw image bytes with their MIME type.
    InlineData {
        /// MIME type sent alongside the bytes.
        mime_type: String,
        /// Raw (not base64-encoded) bytes.
        data: Vec<u8>,
    },
    /// Plain text.
    Text(String),
}

impl Part {
    /// Creates an image part.
    pub fn image(data: Vec<u8>, format: ImageFormat) -> Self {
        Self::InlineData {
            mime_type: format.mime_type().to_string(),
            data,
        }
    }

    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::InlineData { .. } => None,
        }
    }

    /// Returns true for image parts.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::InlineData { .. })
    }
}

/// The ordered content of a single user turn sent to the service.
///
/// Built once per job and never mutated afterwards, so only accessors are
/// exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    parts: Vec<Part>,
}

impl RequestPayload {
    /// Role attached to every payload.
    pub const ROLE: &'static str = "user";

    pub(crate) fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Returns the role of the turn (always `"user"`).
    pub fn role(&self) -> &'static str {
        Self::ROLE
    }

    /// Returns the parts in send order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns the number of reference image parts.
    pub fn reference_count(&self) -> usize {
        self.parts.iter().filter(|p| p.is_image()).count()
    }

    /// Returns the prompt text (the last text part).
    pub fn prompt(&self) -> Option<&str> {
        self.parts.iter().rev().find_map(Part::as_text)
    }
}

/// Inline binary data returned by the service, already base64-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    /// MIME type reported by the service.
    pub mime_type: String,
    /// Decoded bytes.
    pub data: Vec<u8>,
}

/// One part of a response candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsePart {
    /// Inline binary data, if the part carries any.
    pub inline_data: Option<InlineData>,
    /// Text content, if the part carries any.
    pub text: Option<String>,
}

impl ResponsePart {
    /// Returns the inline data when it is present and non-empty.
    pub fn image_data(&self) -> Option<&InlineData> {
        self.inline_data.as_ref().filter(|d| !d.data.is_empty())
    }
}

/// One alternative produced by the service for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Parts in the order the service returned them.
    pub parts: Vec<ResponsePart>,
}

/// A normalized response from any generation strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "a generation response should be written or inspected"]
pub struct GenerationResponse {
    /// Candidates in the order the service returned them.
    pub candidates: Vec<Candidate>,
    /// Model that produced the response.
    pub model: Option<String>,
    /// Wall-clock time of the call in milliseconds.
    pub duration_ms: Option<u64>,
}

impl GenerationResponse {
    /// Returns the first part carrying non-empty image data, scanning
    /// candidates in order, then parts within each candidate in order.
    pub fn first_image(&self) -> Option<&InlineData> {
        self.candidates
            .iter()
            .flat_map(|c| c.parts.iter())
            .find_map(ResponsePart::image_data)
    }

    /// Concatenated text parts, if the model returned any.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}
