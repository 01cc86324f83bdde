//! Built-in brand asset sets, one per strategy.

use crate::job::AssetJob;
use crate::types::{AspectRatio, GenerationConfig, Modality};
use std::time::Duration;

/// Multimodal model that accepts reference images.
pub const MODEL_FLASH_IMAGE_PREVIEW: &str = "gemini-2.5-flash-image-preview";

/// Nano Banana Pro preview model.
pub const MODEL_NANO_BANANA_PRO: &str = "nano-banana-pro-preview";

/// Style prefix tying generated assets to the app's visual identity.
pub const BRAND_STYLE_INSTRUCTION: &str = "Using the attached UI screenshots as the strict visual style reference (color palette: #6D00FF Violet, #00F5AA Mint, #050505 Void; Glassmorphism texture, premium dark mode aesthetic), generate the following asset: ";

/// UI screenshots used as style references.
pub const REFERENCE_PATHS: [&str; 4] = [
    "assets/ref1.png",
    "assets/ref2.png",
    "assets/ref3.png",
    "assets/ref4.png",
];

/// Home screen hero image.
pub const OUTPUT_GYM_LIFT: &str = "assets/ngx_gym_lift.png";
/// Workout screen action shot.
pub const OUTPUT_PULLUP: &str = "assets/ngx_pullup.png";
/// Progress screen device close-up.
pub const OUTPUT_WEARABLE: &str = "assets/ngx_wearable.png";
/// Auth screen background texture.
pub const OUTPUT_RECOVERY_LIGHT: &str = "assets/ngx_recovery_light.png";

const SCREEN_PROMPTS: [(&str, &str); 4] = [
    (
        OUTPUT_GYM_LIFT,
        "Hero image for Home Screen. A cinematic, dark photography shot of a gym setting. Focus on a barbell with weights. Lighting is moody with heavy Violet (#6D00FF) and Mint (#00F5AA) rim lighting. High contrast, professional, motivating. Matches the dark glass UI style.",
    ),
    (
        OUTPUT_PULLUP,
        "Action shot for Workout Screen. Silhouette of a fit athlete performing a pull-up. Dark background, neon Mint (#00F5AA) glowing elements or lighting effects highlighting the motion. Intense, high-energy, premium fitness aesthetic.",
    ),
    (
        OUTPUT_WEARABLE,
        "Detail shot for Progress Screen. Close-up of a high-tech smart fitness watch or wearable device. The screen displays 'activity rings' in Mint and Violet colors. Sleek, glass texture, reflections, tech-noir style.",
    ),
    (
        OUTPUT_RECOVERY_LIGHT,
        "Background for Auth/Login. Abstract, ethereal energy flow. Smooth gradients of Violet (#6D00FF) and Mint (#00F5AA) blending into deep black. Glass dispersion effects, soft, calming, premium wallpaper style.",
    ),
];

const MOOD_PROMPTS: [(&str, &str); 4] = [
    (
        OUTPUT_GYM_LIFT,
        "Cinematic gym atmosphere, dark moody lighting with violet and mint accents, focus on heavy weights or barbell, high contrast, sleek modern fitness aesthetic, 8k resolution, vertical orientation",
    ),
    (
        OUTPUT_PULLUP,
        "Cinematic fitness photography, athlete doing pullups, silhouette against moody lighting, neon mint highlights, intense atmosphere, high quality, 8k, vertical orientation",
    ),
    (
        OUTPUT_WEARABLE,
        "Futuristic smartwatch fitness tracker close-up, displaying activity rings, glowing mint and violet interface, dark glass background, tech noir style, high detail product photography, vertical orientation",
    ),
    (
        OUTPUT_RECOVERY_LIGHT,
        "Abstract soothing energy flow, mint and violet gradient waves, glass texture, ethereal light, calm and restorative atmosphere, high resolution wallpaper style, vertical orientation",
    ),
];

/// Reference-conditioned screen assets for the multimodal call.
pub fn screen_jobs() -> Vec<AssetJob> {
    SCREEN_PROMPTS
        .iter()
        .map(|(output, prompt)| AssetJob::new(*prompt, *output).with_references(REFERENCE_PATHS))
        .collect()
}

/// Text-only mood prompts. The streamed variant spells out the ratio since
/// it has no aspect-ratio parameter.
pub fn mood_jobs(spell_out_ratio: bool) -> Vec<AssetJob> {
    let suffix = if spell_out_ratio { " 9:16." } else { "." };
    MOOD_PROMPTS
        .iter()
        .map(|(output, prompt)| AssetJob::new(format!("{prompt}{suffix}"), *output))
        .collect()
}

/// Generation config for the reference-conditioned multimodal call.
pub fn screen_generation_config() -> GenerationConfig {
    GenerationConfig::new()
        .with_modalities([Modality::Image])
        .with_temperature(0.4)
}

/// Generation config for the dedicated image call.
pub fn images_generation_config() -> GenerationConfig {
    GenerationConfig::new()
        .with_number_of_images(1)
        .with_aspect_ratio(AspectRatio::Portrait)
}

/// Generation config for the streamed call.
pub fn stream_generation_config() -> GenerationConfig {
    GenerationConfig::new().with_modalities([Modality::Image, Modality::Text])
}

/// Default pause between jobs.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Shorter pause used by the text-only presets.
pub const SHORT_DELAY: Duration = Duration::from_secs(1);
