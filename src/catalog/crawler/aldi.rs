use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{debug, info};

use super::CatalogCrawler;
use crate::catalog::model::{Catalog, Store};
use crate::config::CATALOG_VALID_DAYS;
use crate::source::http_source::HttpSource;

pub const ALDI_OFFERS_URL: &str = "https://www.aldi.hu/hu/ajanlatok/online-akcios-ujsag.html";

const CATALOG_TITLE_PREFIX: &str = "ALDI online akciós újság";

pub struct AldiCrawler {
    http: Arc<HttpSource>,
    page_url: String,
    now: NaiveDateTime,
}

impl AldiCrawler {
    pub fn new(http: Arc<HttpSource>, now: NaiveDateTime) -> Self {
        Self::with_page_url(http, ALDI_OFFERS_URL, now)
    }

    pub fn with_page_url(http: Arc<HttpSource>, page_url: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            http,
            page_url: page_url.into(),
            now,
        }
    }
}

#[async_trait]
impl CatalogCrawler for AldiCrawler {
    fn store(&self) -> Store {
        Store::Aldi
    }

    async fn catalogs(&self) -> Result<Vec<Catalog>> {
        info!("fetching url: {}", self.page_url);
        let html = self.http.fetch_text(&self.page_url).await?;
        let links = catalog_links(&html);
        info!("found {} catalog links", links.len());

        let page = Url::parse(&self.page_url)?;
        let mut catalogs = Vec::new();
        for href in links {
            let url = page.join(&href).map(String::from).unwrap_or(href);
            let Some((valid_from, valid_to)) = dates_from_url(&url) else {
                debug!("skipping entry without valid dates: {}", url);
                continue;
            };
            let mut catalog = Catalog::new(url, valid_from, valid_to);
            catalog.last_updated = Some(self.now);
            debug!("created catalog entry: {:?}", catalog);
            catalogs.push(catalog);
        }

        info!("found {} unique catalogs with valid dates", catalogs.len());
        Ok(catalogs)
    }
}

/// Hrefs of catalog anchors, in page order, without duplicates.
pub fn catalog_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[title][href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for el in doc.select(&selector) {
        let title = el.value().attr("title").unwrap_or_default();
        if !title.starts_with(CATALOG_TITLE_PREFIX) {
            continue;
        }
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if !seen.insert(href.to_string()) {
            debug!("skipping duplicate url: {}", href);
            continue;
        }
        links.push(href.to_string());
    }
    links
}

static URL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d{4})_(\d{2})_(\d{2})_").unwrap());

/// Validity window encoded in URLs like `online_akcios_ujsag_2025_01_02_kw01`.
pub fn dates_from_url(url: &str) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let caps = URL_DATE.captures(url)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    let valid_from = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Some((valid_from, valid_from + Duration::days(CATALOG_VALID_DAYS)))
}
