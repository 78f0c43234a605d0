use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use super::CatalogCrawler;
use crate::catalog::model::{Catalog, Store};
use crate::config::CATALOG_VALID_DAYS;
use crate::source::http_source::HttpSource;

pub const LIDL_SITE: &str = "https://www.lidl.hu";

/// LIDL publishes one catalog per week starting on Thursday. Catalog pages
/// are not listed anywhere, so URLs are derived from the week number and
/// kept only if the site answers for them.
pub struct LidlCrawler {
    http: Arc<HttpSource>,
    site: String,
    now: NaiveDateTime,
}

impl LidlCrawler {
    pub fn new(http: Arc<HttpSource>, now: NaiveDateTime) -> Self {
        Self::with_site(http, LIDL_SITE, now)
    }

    pub fn with_site(http: Arc<HttpSource>, site: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            http,
            site: site.into(),
            now,
        }
    }

    pub fn catalog_url(&self, valid_from: NaiveDate) -> String {
        format!(
            "{}/l/hu/ujsag/akcios-ujsag-{:02}-het-{}/ar/0?lf=HHZ",
            self.site.trim_end_matches('/'),
            valid_from.iso_week().week(),
            valid_from.year()
        )
    }

    async fn url_exists(&self, url: &str) -> bool {
        match self.http.probe(url).await {
            Ok(status) => status == 200,
            Err(e) => {
                debug!("url validation failed for {}: {}", url, e);
                false
            }
        }
    }
}

#[async_trait]
impl CatalogCrawler for LidlCrawler {
    fn store(&self) -> Store {
        Store::Lidl
    }

    async fn catalogs(&self) -> Result<Vec<Catalog>> {
        let mut catalogs = Vec::new();
        for (valid_from, valid_to) in weekly_windows(self.now.date()) {
            let url = self.catalog_url(valid_from.date());
            if !self.url_exists(&url).await {
                debug!("skipping invalid url: {}", url);
                continue;
            }
            let mut catalog = Catalog::new(url, valid_from, valid_to);
            catalog.last_updated = Some(self.now);
            debug!("created catalog entry: {:?}", catalog);
            catalogs.push(catalog);
        }
        info!("generated {} catalog entries", catalogs.len());
        Ok(catalogs)
    }
}

/// Thursday-to-Wednesday windows of the previous and the current week.
pub fn weekly_windows(today: NaiveDate) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    [-1i64, 0]
        .into_iter()
        .filter_map(|week_offset| {
            let target = today + Duration::days(7 * week_offset);
            let monday = target - Duration::days(i64::from(target.weekday().num_days_from_monday()));
            let valid_from = (monday + Duration::days(3)).and_hms_opt(0, 0, 0)?;
            Some((valid_from, valid_from + Duration::days(CATALOG_VALID_DAYS)))
        })
        .collect()
}
