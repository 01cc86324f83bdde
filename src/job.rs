//! Asset jobs and their per-job outcome.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One image to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetJob {
    /// Text prompt describing the asset.
    pub prompt: String,
    /// Where the generated bytes are written.
    #[serde(rename = "output")]
    pub output_path: PathBuf,
    /// Reference images, sent before the prompt in this order.
    #[serde(default, rename = "references")]
    pub reference_paths: Vec<PathBuf>,
}

impl AssetJob {
    /// Creates a job without reference images.
    pub fn new(prompt: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            prompt: prompt.into(),
            output_path: output_path.into(),
            reference_paths: Vec::new(),
        }
    }

    /// Sets the reference images.
    pub fn with_references<I, P>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.reference_paths = references.into_iter().map(Into::into).collect();
        self
    }
}

/// Processing state of a job. Terminal states are final; there is no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Not started.
    Pending,
    /// Reading references and assembling the payload.
    Building,
    /// Waiting on the remote service.
    Requesting,
    /// An image was written.
    Succeeded,
    /// No image was written.
    Failed,
}

impl JobState {
    /// Returns true for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Building => write!(f, "building"),
            Self::Requesting => write!(f, "requesting"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one job in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Output path of the job.
    pub output_path: PathBuf,
    /// Final state, always terminal.
    pub state: JobState,
    /// Number of reference images actually sent.
    pub references_sent: usize,
    /// Bytes written on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_written: Option<usize>,
    /// Why the job failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobReport {
    /// Returns true if the job wrote an image.
    pub fn succeeded(&self) -> bool {
        self.state == JobState::Succeeded
    }
}
