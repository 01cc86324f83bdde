//! Error types for asset generation.

use std::time::Duration;

/// Errors that can occur while generating assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetGenError {
    /// API key missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized error message from the response body.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Wait suggested by the `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters (unknown model, empty prompt, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data or an event stream.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (reading references, writing outputs).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Batch configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AssetGenError {
    /// Returns true when the failure came from the remote service or the
    /// transport to it, as opposed to local files or configuration.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Auth(_)
                | Self::Api { .. }
                | Self::RateLimited { .. }
                | Self::ContentBlocked(_)
                | Self::Network(_)
                | Self::Decode(_)
                | Self::Json(_)
        )
    }
}

impl From<toml::de::Error> for AssetGenError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for asset generation operations.
pub type Result<T> = std::result::Result<T, AssetGenError>;

const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Trims an error body for logging, pulling `error.message` out of JSON
/// bodies when present.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| text.trim().to_string());

    if message.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = message.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{truncated}...")
    } else {
        message
    }
}

/// Reads a `Retry-After` header expressed in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(AssetGenError::RateLimited { retry_after: None }.is_remote());
        assert!(AssetGenError::Auth("bad key".into()).is_remote());
        assert!(AssetGenError::ContentBlocked("nsfw".into()).is_remote());
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(AssetGenError::Json(json).is_remote());

        assert!(!AssetGenError::Config("bad toml".into()).is_remote());
        assert!(!AssetGenError::InvalidRequest("empty".into()).is_remote());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!AssetGenError::Io(io).is_remote());
    }

    #[test]
    fn test_error_display() {
        let err = AssetGenError::Api {
            status: 404,
            message: "Not found".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = AssetGenError::ContentBlocked("Safety filter triggered".into());
        assert_eq!(err.to_string(), "content blocked: Safety filter triggered");
    }

    #[test]
    fn test_sanitize_extracts_json_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        assert_eq!(sanitize_error_message(body), "API key not valid");
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(MAX_ERROR_MESSAGE_LEN + 50);
        let sanitized = sanitize_error_message(&body);
        assert!(sanitized.ends_with("..."));
        assert_eq!(sanitized.chars().count(), MAX_ERROR_MESSAGE_LEN + 3);
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = reqwest::header::HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(reqwest::header::RETRY_AFTER, "30".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(30));
    }
}
