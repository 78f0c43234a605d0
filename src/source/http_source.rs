use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Url};
use tracing::{debug, warn};

use super::traits::ResourceSource;
use crate::config::{BROWSER_USER_AGENT, PROBE_TIMEOUT_SECONDS};

/// HTTP source. Relative paths resolve against `base_url` the way a browser
/// resolves them against the page URL; absolute URLs pass through unchanged.
pub struct HttpSource {
    client: Client,
    base_url: Url,
    probe_timeout: Duration,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| anyhow!("invalid base url: {}", e))?;
        // A site root without a trailing slash would lose its last segment on join.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().user_agent(BROWSER_USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url,
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECONDS),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| anyhow!("cannot resolve {} against {}: {}", path, self.base_url, e))
    }

    async fn send_checked(&self, req: RequestBuilder, url: &Url) -> Result<reqwest::Response> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!("http get status={} url={}", status.as_u16(), url);
        if !status.is_success() {
            warn!("http get failed status={} url={}", status.as_u16(), url);
            return Err(anyhow!("fetch failed: HTTP {}", status.as_u16()));
        }
        Ok(resp)
    }

    /// GET a page and decode it as text.
    pub async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.resolve(path)?;
        let resp = self.send_checked(self.client.get(url.clone()), &url).await?;
        Ok(resp.text().await?)
    }

    /// HEAD a URL (redirects followed) and return the final status code.
    pub async fn probe(&self, path: &str) -> Result<u16> {
        let url = self.resolve(path)?;
        let resp = self
            .client
            .head(url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await?;
        let status = resp.status().as_u16();
        debug!("http probe status={} url={}", status, url);
        Ok(status)
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Bytes> {
        let url = self.resolve(path)?;
        let resp = self.send_checked(self.client.get(url.clone()), &url).await?;
        let bytes = resp.bytes().await?;
        Ok(bytes)
    }
}
