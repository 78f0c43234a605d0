use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Where the viewer reads its resources from.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Fetch the resource at `path` (relative to the source root) and return its body.
    async fn fetch(&self, path: &str) -> Result<Bytes>;
}
