use async_trait::async_trait;
use reqwest::Client;

use crate::error::{CinegenError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Retrieves the bytes behind one locator. Each call stands alone, so a
/// failed fetch is retried by calling again with the same locator.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<FetchedImage>;
}

#[derive(Clone, Default)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchedImage> {
        log::debug!("Fetching image: {}", locator);

        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| CinegenError::fetch(locator, e))?;

        let status = response.status();
        if !status.is_success() {
            log::error!(
                "Image service returned {} ({} byte body)",
                status,
                response
                    .content_length()
                    .map_or_else(|| "unknown".to_string(), |len| len.to_string())
            );
            return Err(CinegenError::fetch(
                locator,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CinegenError::fetch(locator, e))?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
