//! Persists the first usable image of a response.

use crate::error::Result;
use crate::types::{GenerationResponse, ImageFormat};
use std::path::Path;

/// What the writer did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Image bytes were written.
    Written {
        /// Number of bytes written.
        bytes: usize,
        /// Format reported by the service, if recognized.
        format: Option<ImageFormat>,
    },
    /// The response carried no non-empty image data; nothing was written.
    NoImage,
}

impl WriteOutcome {
    /// Returns true if a file was written.
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Writes the first non-empty inline image of `response` to `path`,
/// replacing any existing file.
///
/// When the response has no such image, no file is created or touched.
pub async fn write_first_image(
    response: &GenerationResponse,
    path: impl AsRef<Path>,
) -> Result<WriteOutcome> {
    let path = path.as_ref();
    let Some(image) = response.first_image() else {
        return Ok(WriteOutcome::NoImage);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &image.data).await?;

    let format = ImageFormat::from_mime_type(&image.mime_type);
    if let Some(format) = format {
        let matches_name = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(format.extension()));
        if !matches_name {
            tracing::debug!(
                output = %path.display(),
                mime_type = %image.mime_type,
                "service returned a format that differs from the file extension"
            );
        }
    }

    Ok(WriteOutcome::Written {
        bytes: image.data.len(),
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Candidate, InlineData, ResponsePart};

    fn response_with(data: &[u8]) -> GenerationResponse {
        GenerationResponse {
            candidates: vec![Candidate {
                parts: vec![ResponsePart {
                    inline_data: Some(InlineData {
                        mime_type: "image/png".into(),
                        data: data.to_vec(),
                    }),
                    text: None,
                }],
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_writes_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let outcome = write_first_image(&response_with(b"PNGDATA"), &path).await.unwrap();

        assert_eq!(
            outcome,
            WriteOutcome::Written {
                bytes: 7,
                format: Some(ImageFormat::Png)
            }
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"PNGDATA");
    }

    #[tokio::test]
    async fn test_no_image_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let outcome = write_first_image(&response_with(b""), &path).await.unwrap();
        assert_eq!(outcome, WriteOutcome::NoImage);
        assert!(!path.exists());

        let outcome = write_first_image(&GenerationResponse::default(), &path)
            .await
            .unwrap();
        assert!(!outcome.is_written());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"an older and longer image").unwrap();

        write_first_image(&response_with(b"NEW"), &path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"NEW");
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets").join("nested").join("out.png");

        write_first_image(&response_with(b"X"), &path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"X");
    }
}
