use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::lidl::LidlCrawler;
use super::CatalogCrawler;
use crate::catalog::model::{Catalog, Store};

pub const TESCO_SITE: &str = "https://tesco.hu";

const STORE_TYPES: &[&str] = &["hipermarket"];

/// TESCO leaflets run on the same weekly schedule as LIDL's, so the dates
/// of the LIDL catalogs that exist are reused to build TESCO URLs.
pub struct TescoCrawler {
    lidl: LidlCrawler,
    site: String,
}

impl TescoCrawler {
    pub fn new(lidl: LidlCrawler) -> Self {
        Self::with_site(lidl, TESCO_SITE)
    }

    pub fn with_site(lidl: LidlCrawler, site: impl Into<String>) -> Self {
        Self {
            lidl,
            site: site.into(),
        }
    }
}

#[async_trait]
impl CatalogCrawler for TescoCrawler {
    fn store(&self) -> Store {
        Store::Tesco
    }

    async fn catalogs(&self) -> Result<Vec<Catalog>> {
        let lidl_catalogs = self.lidl.catalogs().await?;
        if lidl_catalogs.is_empty() {
            warn!("no LIDL catalogs found to base dates on");
            return Ok(Vec::new());
        }

        let site = self.site.trim_end_matches('/');
        let mut catalogs = Vec::new();
        for lidl in lidl_catalogs {
            let (Some(valid_from), Some(valid_to)) = (lidl.valid_from, lidl.valid_to) else {
                continue;
            };
            let day = valid_from.format("%Y-%m-%d").to_string();
            for store_type in STORE_TYPES {
                let mut catalog = Catalog::new(
                    format!("{}/katalogus-oldalak/{}/tesco-ujsag-{}/", site, store_type, day),
                    valid_from,
                    valid_to,
                );
                catalog.image_url = Some(format!(
                    "{}/img/tescoce_hu/leaflets/{}/medium/F1.jpg",
                    site, day
                ));
                catalog.last_updated = lidl.last_updated;
                debug!("created catalog entry: {:?}", catalog);
                catalogs.push(catalog);
            }
        }

        info!("generated {} catalog entries", catalogs.len());
        Ok(catalogs)
    }
}
