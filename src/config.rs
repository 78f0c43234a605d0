use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::model::Store;

/// Relative path of the JSON resource the viewer displays.
pub const DATA_INDEX_PATH: &str = "data/index.json";

/// Identifier of the page element that receives the rendered data.
pub const CONTENT_ELEMENT_ID: &str = "content";

/// Message shown in the content element when loading fails for any reason.
pub const LOAD_FAILURE_MESSAGE: &str = "Error loading data";

/// Directory (relative to the site root) holding the JSON index files.
pub const DATA_DIR: &str = "data";

/// Browser user agent sent to store websites; some reject unknown clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Timeout for HEAD probes used to validate generated catalog URLs.
pub const PROBE_TIMEOUT_SECONDS: u64 = 5;

/// Number of days a weekly catalog stays valid after its first day.
pub const CATALOG_VALID_DAYS: i64 = 6;

/// Top-level configuration for the viewer and the catalog pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base URL the loader resolves `data/index.json` against.
    pub base_url: String,
    /// Root directory of the generated site (index.html + data/).
    pub site_dir: PathBuf,
    /// Stores crawled and listed, in crawl order.
    pub stores: Vec<Store>,
    /// Address the site server binds to.
    pub bind_addr: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            site_dir: PathBuf::from("."),
            stores: vec![Store::Aldi, Store::Lidl],
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Read a JSON config file. Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Directory holding the per-store and combined JSON index files.
    pub fn data_dir(&self) -> PathBuf {
        self.site_dir.join(DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{"base_url": "http://example.test/site/", "stores": ["LIDL"]}"#)
            .unwrap();

        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url, "http://example.test/site/");
        assert_eq!(config.stores, vec![Store::Lidl]);
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.data_dir(), PathBuf::from("./data"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ViewerConfig::from_file(&dir.path().join("nope.json")).is_err());
    }
}
