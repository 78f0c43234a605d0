// Store crawlers: each discovers the store's current catalogs and feeds the index store.

pub mod aldi;
pub mod lidl;
pub mod spar;
pub mod tesco;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{error, info};

use super::index_store::IndexStore;
use super::model::{Catalog, Store};
use crate::source::http_source::HttpSource;

#[async_trait]
pub trait CatalogCrawler: Send + Sync {
    fn store(&self) -> Store;
    async fn catalogs(&self) -> Result<Vec<Catalog>>;
}

/// Crawl one store and merge the result into its index file.
pub async fn run_crawler(crawler: &dyn CatalogCrawler, index: &IndexStore) -> Result<usize> {
    let store = crawler.store();
    info!("starting {} catalog crawler", store);
    let catalogs = crawler.catalogs().await?;
    let written = index.update(store, catalogs)?;
    info!("{} crawler finished successfully", store);
    Ok(written)
}

/// Crawler for `store` against the live store websites.
pub fn crawler_for(store: Store, http: Arc<HttpSource>, now: NaiveDateTime) -> Box<dyn CatalogCrawler> {
    match store {
        Store::Aldi => Box::new(aldi::AldiCrawler::new(http, now)),
        Store::Lidl => Box::new(lidl::LidlCrawler::new(http, now)),
        Store::Tesco => Box::new(tesco::TescoCrawler::new(lidl::LidlCrawler::new(http, now))),
        Store::Spar => Box::new(spar::SparCrawler::new(http, now)),
    }
}

/// Run crawlers in order. A failing crawler is logged and does not stop the rest.
/// Returns the number of crawlers that completed.
pub async fn crawl_all(crawlers: &[Box<dyn CatalogCrawler>], index: &IndexStore) -> usize {
    let mut completed = 0;
    for crawler in crawlers {
        match run_crawler(crawler.as_ref(), index).await {
            Ok(_) => completed += 1,
            Err(e) => error!("{} crawler failed: {:#}", crawler.store(), e),
        }
    }
    completed
}
