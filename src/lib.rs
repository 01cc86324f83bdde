#![warn(missing_docs)]
//! assetgen - batch generation of branded image assets with Gemini.
//!
//! A batch is a list of [`AssetJob`]s. Each job goes through the
//! [`AssetRequestBuilder`] (reference images plus a style-prefixed prompt),
//! a [`GenerationStrategy`] (one of three call shapes against the Gemini
//! API) and finally [`write_first_image`]. The [`BatchDriver`] runs jobs
//! sequentially with a fixed pause in between and never stops on a failed
//! job.
//!
//! # Quick Start
//!
//! ```no_run
//! use assetgen::{BatchConfig, BatchDriver, GeminiClient, StrategyKind};
//!
//! #[tokio::main]
//! async fn main() -> assetgen::Result<()> {
//!     let config = BatchConfig::preset(StrategyKind::Content);
//!     let client = GeminiClient::builder().model(&config.model).build()?;
//!     let driver = BatchDriver::new(config.strategy.into_strategy(client), &config);
//!
//!     for report in driver.run(&config.jobs).await {
//!         println!("{}: {}", report.output_path.display(), report.state);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Strategies
//!
//! - [`StrategyKind::Content`]: one multimodal `generateContent` call.
//! - [`StrategyKind::Images`]: dedicated image generation, prompt only.
//! - [`StrategyKind::Stream`]: `streamGenerateContent`, first image chunk wins.

mod error;

pub mod batch;
pub mod client;
pub mod config;
pub mod job;
pub mod presets;
pub mod request;
pub mod strategies;
pub mod strategy;
pub mod types;
pub mod writer;

// Re-export error types at crate root
pub use error::{AssetGenError, Result};

pub use batch::BatchDriver;
pub use client::{GeminiClient, GeminiClientBuilder};
pub use config::BatchConfig;
pub use job::{AssetJob, JobReport, JobState};
pub use request::AssetRequestBuilder;
pub use strategies::{ContentStrategy, ImagesStrategy, StreamStrategy};
pub use strategy::{GenerationStrategy, StrategyKind};
pub use types::{
    AspectRatio, Candidate, GenerationConfig, GenerationResponse, ImageFormat, InlineData,
    Modality, Part, RequestPayload, ResponsePart,
};
pub use writer::{write_first_image, WriteOutcome};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::batch::BatchDriver;
    pub use crate::client::GeminiClient;
    pub use crate::config::BatchConfig;
    pub use crate::error::{AssetGenError, Result};
    pub use crate::job::{AssetJob, JobReport};
    pub use crate::strategy::{GenerationStrategy, StrategyKind};
}
