//! Batch configuration: built-in presets, optionally overridden by a TOML
//! file.

use crate::error::{AssetGenError, Result};
use crate::job::AssetJob;
use crate::presets;
use crate::strategy::StrategyKind;
use crate::types::{AspectRatio, GenerationConfig, Modality};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything a batch run needs apart from the API key.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Which call shape to use.
    pub strategy: StrategyKind,
    /// Model identifier.
    pub model: String,
    /// Prefix prepended to every prompt.
    pub style_instruction: String,
    /// Pause between consecutive jobs.
    pub delay: Duration,
    /// Generation settings shared by every job.
    pub generation: GenerationConfig,
    /// Jobs, in processing order.
    pub jobs: Vec<AssetJob>,
}

impl BatchConfig {
    /// Returns the built-in asset set for `strategy`.
    pub fn preset(strategy: StrategyKind) -> Self {
        match strategy {
            StrategyKind::Content => Self {
                strategy,
                model: presets::MODEL_FLASH_IMAGE_PREVIEW.to_string(),
                style_instruction: presets::BRAND_STYLE_INSTRUCTION.to_string(),
                delay: presets::DEFAULT_DELAY,
                generation: presets::screen_generation_config(),
                jobs: presets::screen_jobs(),
            },
            StrategyKind::Images => Self {
                strategy,
                model: presets::MODEL_NANO_BANANA_PRO.to_string(),
                style_instruction: String::new(),
                delay: presets::SHORT_DELAY,
                generation: presets::images_generation_config(),
                jobs: presets::mood_jobs(false),
            },
            StrategyKind::Stream => Self {
                strategy,
                model: presets::MODEL_NANO_BANANA_PRO.to_string(),
                style_instruction: String::new(),
                delay: presets::SHORT_DELAY,
                generation: presets::stream_generation_config(),
                jobs: presets::mood_jobs(true),
            },
        }
    }

    /// Loads a TOML config file. `strategy` overrides the file's strategy.
    pub fn load(path: impl AsRef<Path>, strategy: Option<StrategyKind>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AssetGenError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text, strategy)
    }

    /// Parses a TOML config. Fields the file leaves out come from the
    /// preset of the resolved strategy.
    pub fn from_toml_str(text: &str, strategy: Option<StrategyKind>) -> Result<Self> {
        let file: BatchFile = toml::from_str(text)?;
        let strategy = strategy.or(file.strategy).unwrap_or_default();
        let mut config = Self::preset(strategy);

        if let Some(model) = file.model {
            config.model = model;
        }
        if let Some(style) = file.style_instruction {
            config.style_instruction = style;
        }
        if let Some(secs) = file.delay_secs {
            if !secs.is_finite() || secs < 0.0 {
                return Err(AssetGenError::Config(format!(
                    "delay_secs must be a non-negative number, got {secs}"
                )));
            }
            config.delay = Duration::from_secs_f64(secs);
        }
        if let Some(overlay) = file.generation {
            overlay.apply(&mut config.generation);
        }

        if let Some(entries) = file.jobs {
            let shared = file.references.clone().unwrap_or_default();
            config.jobs = entries
                .into_iter()
                .map(|entry| AssetJob {
                    prompt: entry.prompt,
                    output_path: entry.output,
                    reference_paths: entry.references.unwrap_or_else(|| shared.clone()),
                })
                .collect();
        } else if let Some(shared) = file.references {
            for job in &mut config.jobs {
                job.reference_paths = shared.clone();
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AssetGenError::Config("model must not be empty".into()));
        }
        if self.jobs.is_empty() {
            return Err(AssetGenError::Config("no jobs configured".into()));
        }
        for (i, job) in self.jobs.iter().enumerate() {
            if job.prompt.trim().is_empty() {
                return Err(AssetGenError::Config(format!("job {} has an empty prompt", i + 1)));
            }
            if job.output_path.as_os_str().is_empty() {
                return Err(AssetGenError::Config(format!("job {} has no output path", i + 1)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchFile {
    strategy: Option<StrategyKind>,
    model: Option<String>,
    style_instruction: Option<String>,
    delay_secs: Option<f64>,
    generation: Option<GenerationOverlay>,
    references: Option<Vec<PathBuf>>,
    jobs: Option<Vec<JobEntry>>,
}

/// `[generation]` table. Only the keys present replace preset values.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerationOverlay {
    response_modalities: Option<Vec<Modality>>,
    aspect_ratio: Option<AspectRatio>,
    temperature: Option<f32>,
    number_of_images: Option<u32>,
}

impl GenerationOverlay {
    fn apply(self, generation: &mut GenerationConfig) {
        if let Some(modalities) = self.response_modalities {
            generation.response_modalities = modalities;
        }
        if let Some(ratio) = self.aspect_ratio {
            generation.aspect_ratio = Some(ratio);
        }
        if let Some(temperature) = self.temperature {
            generation.temperature = Some(temperature);
        }
        if let Some(count) = self.number_of_images {
            generation.number_of_images = Some(count);
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobEntry {
    prompt: String,
    output: PathBuf,
    references: Option<Vec<PathBuf>>,
}
