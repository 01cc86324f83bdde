//! Assembles request payloads from a prompt, a style instruction and
//! reference images.

use crate::types::{ImageFormat, Part, RequestPayload};
use std::path::Path;

/// Builds a [`RequestPayload`] for each job.
///
/// References are read from disk on every build. A reference that cannot be
/// read is logged and skipped; it never fails the job.
#[derive(Debug, Clone, Default)]
pub struct AssetRequestBuilder {
    style_instruction: String,
}

impl AssetRequestBuilder {
    /// Creates a builder that prefixes every prompt with `style_instruction`.
    pub fn new(style_instruction: impl Into<String>) -> Self {
        Self {
            style_instruction: style_instruction.into(),
        }
    }

    /// Returns the style instruction prepended to prompts.
    pub fn style_instruction(&self) -> &str {
        &self.style_instruction
    }

    /// Reads `references` from disk and assembles the payload.
    pub async fn build<P: AsRef<Path>>(&self, prompt: &str, references: &[P]) -> RequestPayload {
        let mut images = Vec::with_capacity(references.len());
        for path in references {
            let path = path.as_ref();
            match tokio::fs::read(path).await {
                Ok(data) => images.push(data),
                Err(e) => {
                    tracing::warn!(reference = %path.display(), "could not read reference: {e}");
                }
            }
        }
        self.build_from_bytes(prompt, images)
    }

    /// Assembles the payload from reference bytes already in memory.
    ///
    /// Reference parts come first, tagged as PNG whatever their content,
    /// followed by a single text part holding the style instruction and
    /// the prompt.
    pub fn build_from_bytes(&self, prompt: &str, references: Vec<Vec<u8>>) -> RequestPayload {
        let mut parts: Vec<Part> = references
            .into_iter()
            .map(|data| Part::image(data, ImageFormat::Png))
            .collect();
        parts.push(Part::text(format!("{}{}", self.style_instruction, prompt)));
        RequestPayload::new(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_payload() {
        let builder = AssetRequestBuilder::default();
        let payload = builder.build_from_bytes("A puppy", vec![]);

        assert_eq!(payload.parts().len(), 1);
        assert_eq!(payload.prompt(), Some("A puppy"));
    }

    #[test]
    fn test_references_precede_prefixed_prompt() {
        let builder = AssetRequestBuilder::new("Style: ");
        let payload = builder.build_from_bytes("a hero shot", vec![vec![1], vec![2]]);

        let parts = payload.parts();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].is_image());
        assert!(parts[1].is_image());
        assert_eq!(parts[2].as_text(), Some("Style: a hero shot"));
        match &parts[0] {
            Part::InlineData { mime_type, data } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(data, &vec![1]);
            }
            Part::Text(_) => panic!("expected image part"),
        }
    }

    #[tokio::test]
    async fn test_missing_reference_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("ref1.png");
        std::fs::write(&present, b"REF1").unwrap();
        let missing = dir.path().join("ref2.png");

        let builder = AssetRequestBuilder::new("S: ");
        let payload = builder.build("test", &[present, missing]).await;

        assert_eq!(payload.reference_count(), 1);
        assert_eq!(payload.parts().len(), 2);
        assert_eq!(payload.prompt(), Some("S: test"));
    }

    #[tokio::test]
    async fn test_all_references_missing_still_has_prompt() {
        let builder = AssetRequestBuilder::default();
        let payload = builder
            .build("only text", &["/nonexistent/a.png", "/nonexistent/b.png"])
            .await;

        assert_eq!(payload.reference_count(), 0);
        assert_eq!(payload.prompt(), Some("only text"));
    }
}
