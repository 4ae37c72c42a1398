use serde::{Deserialize, Serialize};

use super::image::ImageVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    InFlight,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationState {
    pub status: GenerationStatus,
    pub variants: Vec<ImageVariant>,
}

impl GenerationState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.status == GenerationStatus::Ready
    }

    pub fn locators(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.locator.as_str())
    }
}
