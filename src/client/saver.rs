use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{CinegenError, Result};

/// `cinematic-ai-image-{index+1}-{timestamp}.png`
pub fn file_name_for(index: u32, timestamp_millis: i64) -> String {
    format!("cinematic-ai-image-{}-{}.png", index + 1, timestamp_millis)
}

#[async_trait]
pub trait ImageSaver: Send + Sync {
    async fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf>;
}

/// Writes images into one directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct FileSaver {
    dir: PathBuf,
}

impl FileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl ImageSaver for FileSaver {
    async fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            CinegenError::SaveError(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CinegenError::SaveError(format!("{}: {}", path.display(), e)))?;

        log::debug!("💾 Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}
