use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CinegenError, Result};

pub const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai";
pub const DEFAULT_MODEL: &str = "flux";
pub const DEFAULT_COUNT: u32 = 20;
pub const DEFAULT_DIMENSION: u32 = 1024;
pub const DEFAULT_DOWNLOAD_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Rate limit applied by the downloader between and across fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPolicy {
    pub delay: Duration,
    pub max_concurrent_fetches: usize,
}

impl Default for DownloadPolicy {
    fn default() -> Self {
        DownloadPolicy {
            delay: Duration::from_millis(DEFAULT_DOWNLOAD_DELAY_MS),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

impl DownloadPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub base_url: String,
    pub model: String,
    pub width: u32,
    pub height: u32,
    pub count: u32,
    pub safe: bool,
    pub api_key: Option<String>,
    pub output_dir: PathBuf,
    pub download: DownloadPolicy,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            count: DEFAULT_COUNT,
            safe: true,
            api_key: None,
            output_dir: PathBuf::from("."),
            download: DownloadPolicy::default(),
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `CINEGEN_*` variables on top of the defaults. Unparseable
    /// numbers are reported instead of silently ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("CINEGEN_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = env::var("CINEGEN_MODEL") {
            config.model = model;
        }
        if let Some(width) = parse_var::<u32>("CINEGEN_WIDTH")? {
            config.width = width;
        }
        if let Some(height) = parse_var::<u32>("CINEGEN_HEIGHT")? {
            config.height = height;
        }
        if let Some(count) = parse_var::<u32>("CINEGEN_COUNT")? {
            config.count = count;
        }
        config.safe = env::var("CINEGEN_SAFE")
            .ok()
            .map_or(true, |val| val != "false");
        config.api_key = env::var("CINEGEN_API_KEY").ok().filter(|k| !k.is_empty());
        if let Ok(dir) = env::var("CINEGEN_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(delay) = parse_var::<u64>("CINEGEN_DOWNLOAD_DELAY_MS")? {
            config.download.delay = Duration::from_millis(delay);
        }
        if let Some(max) = parse_var::<usize>("CINEGEN_MAX_CONCURRENT_FETCHES")? {
            config.download = config.download.with_max_concurrent_fetches(max);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_download_policy(mut self, policy: DownloadPolicy) -> Self {
        self.download = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(CinegenError::ConfigError("base URL is required".into()));
        }
        if self.model.trim().is_empty() {
            return Err(CinegenError::ConfigError("model is required".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CinegenError::ConfigError(
                "width and height must be positive".into(),
            ));
        }
        if self.count == 0 {
            return Err(CinegenError::ConfigError("count must be positive".into()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            CinegenError::ConfigError(format!("{} is not a valid number: {}", name, raw))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StudioConfig::new();
        assert_eq!(config.base_url, "https://image.pollinations.ai");
        assert_eq!(config.model, "flux");
        assert_eq!((config.width, config.height), (1024, 1024));
        assert_eq!(config.count, 20);
        assert!(config.safe);
        assert!(config.api_key.is_none());
        assert_eq!(config.download.delay, Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = StudioConfig::new()
            .with_dimensions(512, 768)
            .with_count(4)
            .with_api_key("secret")
            .with_download_policy(DownloadPolicy::new().with_max_concurrent_fetches(0));
        assert_eq!((config.width, config.height), (512, 768));
        assert_eq!(config.count, 4);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.download.max_concurrent_fetches, 1);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(StudioConfig::new().with_count(0).validate().is_err());
        assert!(StudioConfig::new().with_dimensions(0, 10).validate().is_err());
        assert!(StudioConfig::new().with_base_url(" ").validate().is_err());
    }
}
