use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::traits::ResourceSource;

/// Reads resources from a local site directory.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResourceSource for FileSource {
    async fn fetch(&self, path: &str) -> Result<Bytes> {
        let full = self.root.join(path);
        debug!("file fetch path={}", full.display());
        let data = tokio::fs::read(&full)
            .await
            .with_context(|| format!("failed to read {}", full.display()))?;
        Ok(Bytes::from(data))
    }
}
