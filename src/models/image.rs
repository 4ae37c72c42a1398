use serde::{Deserialize, Serialize};

use crate::error::{CinegenError, Result};

pub const PROMPT_PREFIX: &str =
    "Professional advertising photography, cinematic lighting, commercial grade quality.";

pub const PROMPT_SUFFIX: &str = "Shot with professional camera equipment, studio lighting setup, ultra high resolution 8K, award-winning composition, magazine advertisement quality, dramatic shadows and highlights, color graded, photorealistic, masterpiece quality, trending on behance and dribbble.";

/// Distance between the seeds of two neighbouring variants.
pub const SEED_STEP: i64 = 1000;

/// Wraps the user's prompt in the fixed advertisement-quality template.
pub fn enhance_prompt(prompt: &str) -> String {
    format!("{} {}. {}", PROMPT_PREFIX, prompt, PROMPT_SUFFIX)
}

/// One batch of generation work. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    base_prompt: String,
    enhanced_prompt: String,
    count: u32,
    width: u32,
    height: u32,
    base_timestamp: i64,
}

impl GenerationRequest {
    pub fn new(
        base_prompt: impl Into<String>,
        count: u32,
        width: u32,
        height: u32,
        base_timestamp: i64,
    ) -> Result<Self> {
        let base_prompt = base_prompt.into();
        if base_prompt.trim().is_empty() {
            return Err(CinegenError::EmptyPrompt);
        }
        let last_offset = i64::from(count.saturating_sub(1)) * SEED_STEP;
        if base_timestamp.checked_add(last_offset).is_none() {
            return Err(CinegenError::ConfigError(format!(
                "seed base {} leaves no room for {} variants",
                base_timestamp, count
            )));
        }

        Ok(Self {
            enhanced_prompt: enhance_prompt(&base_prompt),
            base_prompt,
            count,
            width,
            height,
            base_timestamp,
        })
    }

    pub fn base_prompt(&self) -> &str {
        &self.base_prompt
    }

    pub fn enhanced_prompt(&self) -> &str {
        &self.enhanced_prompt
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn base_timestamp(&self) -> i64 {
        self.base_timestamp
    }

    /// Exact for every `index < count`; construction rejects timestamps
    /// whose last seed would not fit in an `i64`.
    pub fn seed_for(&self, index: u32) -> i64 {
        self.base_timestamp.saturating_add(i64::from(index) * SEED_STEP)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    pub index: u32,
    pub seed: i64,
    pub locator: String,
}
