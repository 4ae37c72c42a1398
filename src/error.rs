use thiserror::Error;

#[derive(Debug, Error)]
pub enum CinegenError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Fetch failed for {locator}: {reason}")]
    FetchFailure { locator: String, reason: String },
    #[error("Save error: {0}")]
    SaveError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CinegenError {
    pub fn fetch(locator: impl Into<String>, reason: impl ToString) -> Self {
        CinegenError::FetchFailure {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CinegenError>;
