pub mod fetcher;
pub mod saver;

use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    clock::{SystemClock, TimeSource},
    config::{DownloadPolicy, StudioConfig},
    error::Result,
    models::ImageVariant,
    notify::{LogNotifier, Notifier},
};

pub use fetcher::{FetchedImage, HttpImageFetcher, ImageFetcher};
pub use saver::{file_name_for, FileSaver, ImageSaver};

pub const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Please try again.";

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub saved: Vec<(u32, PathBuf)>,
    pub failed: Vec<u32>,
}

impl DownloadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Display and download side of a batch: fetches locators and saves the
/// bytes, one notification per image.
#[derive(Clone)]
pub struct Downloader {
    fetcher: Arc<dyn ImageFetcher>,
    saver: Arc<dyn ImageSaver>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn TimeSource>,
    policy: DownloadPolicy,
}

impl Downloader {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            fetcher: Arc::new(HttpImageFetcher::new()),
            saver: Arc::new(FileSaver::new(&config.output_dir)),
            notifier: Arc::new(LogNotifier),
            clock: Arc::new(SystemClock),
            policy: config.download.clone(),
        }
    }

    pub fn with_collaborators(
        fetcher: Arc<dyn ImageFetcher>,
        saver: Arc<dyn ImageSaver>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            fetcher,
            saver,
            notifier,
            clock,
            policy: DownloadPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DownloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &DownloadPolicy {
        &self.policy
    }

    pub async fn download(&self, variant: &ImageVariant) -> Result<PathBuf> {
        match self.fetch_and_save(variant).await {
            Ok(path) => {
                self.notifier.success(&format!(
                    "Image {} downloaded successfully!",
                    variant.index + 1
                ));
                Ok(path)
            }
            Err(e) => {
                log::warn!("Image {} failed: {}", variant.index + 1, e);
                self.notifier.error(DOWNLOAD_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    async fn fetch_and_save(&self, variant: &ImageVariant) -> Result<PathBuf> {
        let image = self.fetcher.fetch(&variant.locator).await?;
        let file_name = file_name_for(variant.index, self.clock.now_millis());
        self.saver.save(&image.bytes, &file_name).await
    }

    /// Downloads one after another with `policy.delay` between them. A
    /// failure is recorded and the remaining variants still run.
    pub async fn download_all(&self, variants: &[ImageVariant]) -> DownloadReport {
        let mut report = DownloadReport::default();
        let _timer = crate::logger::timer("download_all");

        for (position, variant) in variants.iter().enumerate() {
            if position > 0 && !self.policy.delay.is_zero() {
                tokio::time::sleep(self.policy.delay).await;
            }
            match self.download(variant).await {
                Ok(path) => report.saved.push((variant.index, path)),
                Err(_) => report.failed.push(variant.index),
            }
        }

        log::info!(
            "📦 Downloaded {}/{} images",
            report.saved.len(),
            variants.len()
        );
        report
    }

    /// Fetches every variant for display. Fetches run independently with at
    /// most `policy.max_concurrent_fetches` in flight; results come back
    /// ordered by index.
    pub async fn fetch_all(&self, variants: &[ImageVariant]) -> Vec<(u32, Result<FetchedImage>)> {
        let limit = self.policy.max_concurrent_fetches.max(1);
        let mut results: Vec<(u32, Result<FetchedImage>)> = stream::iter(variants)
            .map(|variant| {
                let fetcher = Arc::clone(&self.fetcher);
                async move { (variant.index, fetcher.fetch(&variant.locator).await) }
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);
        results
    }
}
