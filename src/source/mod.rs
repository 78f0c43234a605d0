// Resource sources: HTTP for a hosted site, filesystem for a local site directory.

pub mod file_source;
pub mod http_source;
pub mod traits;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use self::file_source::FileSource;
use self::http_source::HttpSource;
use self::traits::ResourceSource;
use crate::config::ViewerConfig;

/// Pick where the viewer reads from: an explicit site directory is read
/// from disk, otherwise the site is fetched over HTTP from `base_url`
/// (falling back to the configured one).
pub fn select_source(
    config: &ViewerConfig,
    base_url: Option<&str>,
    site_dir: Option<&Path>,
) -> Result<Arc<dyn ResourceSource>> {
    match (base_url, site_dir) {
        (Some(_), Some(_)) => bail!("a base URL and a site directory cannot both be given"),
        (None, Some(dir)) => Ok(Arc::new(FileSource::new(dir))),
        (base_url, None) => {
            let base_url = base_url.unwrap_or(&config.base_url);
            Ok(Arc::new(HttpSource::new(base_url)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_site_dir_reads_from_disk() {
        let site = tempfile::tempdir().unwrap();
        std::fs::create_dir(site.path().join("data")).unwrap();
        std::fs::write(site.path().join("data/index.json"), "[1]").unwrap();

        let source = select_source(&ViewerConfig::default(), None, Some(site.path())).unwrap();
        assert_eq!(source.fetch("data/index.json").await.unwrap().as_ref(), b"[1]");
    }

    #[test]
    fn test_base_url_and_site_dir_conflict() {
        let site = tempfile::tempdir().unwrap();
        let result = select_source(
            &ViewerConfig::default(),
            Some("http://127.0.0.1:8000/"),
            Some(site.path()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_http_by_default() {
        let mut config = ViewerConfig::default();
        config.base_url = "not a url".to_string();
        assert!(select_source(&config, None, None).is_err());
        assert!(select_source(&config, Some("http://127.0.0.1:8000/"), None).is_ok());
    }
}
