use std::sync::{Arc, LazyLock};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, warn};

use super::CatalogCrawler;
use crate::catalog::model::{Catalog, Store};
use crate::source::http_source::HttpSource;

pub const SPAR_OFFERS_URL: &str = "https://www.spar.hu/ajanlatok";

const FLYER_CAPTION: &str = "SPAR szórólap";

pub struct SparCrawler {
    http: Arc<HttpSource>,
    page_url: String,
    now: NaiveDateTime,
}

impl SparCrawler {
    pub fn new(http: Arc<HttpSource>, now: NaiveDateTime) -> Self {
        Self::with_page_url(http, SPAR_OFFERS_URL, now)
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
impl CatalogCrawler for SparCrawler {
    fn store(&self) -> Store {
        Store::Spar
    }

    async fn catalogs(&self) -> Result<Vec<Catalog>> {
        info!("fetching url: {}", self.page_url);
        let html = self.http.fetch_text(&self.page_url).await?;
        let catalogs = parse_flyers(&html, self.now);
        info!("found {} catalogs", catalogs.len());
        Ok(catalogs)
    }
}

/// Extract SPAR leaflets from the offers page. Dates carry no year on the
/// page; the year of `now` is used.
pub fn parse_flyers(html: &str, now: NaiveDateTime) -> Vec<Catalog> {
    let doc = Html::parse_document(html);
    let Ok(flyer_sel) = Selector::parse(".flyer-teaser__wrapper .flyer-teaser__teaser") else {
        return Vec::new();
    };

    let mut catalogs = Vec::new();
    for flyer in doc.select(&flyer_sel) {
        match parse_flyer(flyer, now) {
            Ok(Some(catalog)) => catalogs.push(catalog),
            Ok(None) => {}
            Err(e) => error!("error processing flyer: {}", e),
        }
    }
    catalogs
}

fn parse_flyer(flyer: ElementRef<'_>, now: NaiveDateTime) -> Result<Option<Catalog>> {
    let caption = collapse_whitespace(&first_text(flyer, ".flyer-teaser__caption")?);
    debug!("cleaned caption text: '{}'", caption);
    if caption.is_empty() {
        warn!("empty caption found, skipping flyer");
        return Ok(None);
    }
    if caption != FLYER_CAPTION {
        debug!("skipping non-leaflet flyer: {}", caption);
        return Ok(None);
    }

    let validity = first_text(flyer, ".flyer-teaser__valid")?;
    let (valid_from, valid_to) = validity_range(&validity, now.year())
        .ok_or_else(|| anyhow!("could not find date range in: {}", validity.trim()))?;

    let url = first_attr(flyer, ".flyer-teaser__teaser-inner", "href")?;
    let image_url = first_attr(flyer, ".flyer-teaser__image", "src")?;

    let mut catalog = Catalog::new(url, valid_from, valid_to);
    catalog.title = Some(caption);
    catalog.image_url = Some(image_url);
    catalog.last_updated = Some(now);
    Ok(Some(catalog))
}

fn first_element<'a>(root: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>> {
    let selector = Selector::parse(css).map_err(|e| anyhow!("bad selector {}: {:?}", css, e))?;
    root.select(&selector)
        .next()
        .ok_or_else(|| anyhow!("no {} element", css))
}

fn first_text(root: ElementRef<'_>, css: &str) -> Result<String> {
    Ok(first_element(root, css)?.text().collect::<Vec<_>>().join(" "))
}

fn first_attr(root: ElementRef<'_>, css: &str, attr: &str) -> Result<String> {
    first_element(root, css)?
        .value()
        .attr(attr)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{} has no {} attribute", css, attr))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

static VALIDITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})\.(\d{2})\.\s*-\s*(\d{2})\.(\d{2})\.").unwrap());

/// Parse `MM.DD. - MM.DD.` out of a validity label.
pub fn validity_range(text: &str, year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let caps = VALIDITY.captures(text)?;
    let day = |m: usize, d: usize| -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, caps[m].parse().ok()?, caps[d].parse().ok()?)?
            .and_hms_opt(0, 0, 0)
    };
    Some((day(1, 2)?, day(3, 4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    const PAGE: &str = r#"<html><body><div class="flyer-teaser__wrapper">
        <div class="flyer-teaser__teaser">
            <a class="flyer-teaser__teaser-inner" href="https://www.spar.hu/ajanlatok/szorolap-0306">
                <img class="flyer-teaser__image" src="https://www.spar.hu/img/0306.jpg">
                <span class="flyer-teaser__teaser-type-header">SPAR</span>
                <span class="flyer-teaser__caption">  SPAR
                    szórólap </span>
                <span class="flyer-teaser__valid">Érvényes: 03.06. - 03.12.</span>
            </a>
        </div>
        <div class="flyer-teaser__teaser">
            <a class="flyer-teaser__teaser-inner" href="https://www.spar.hu/ajanlatok/magazin">
                <img class="flyer-teaser__image" src="https://www.spar.hu/img/mag.jpg">
                <span class="flyer-teaser__caption">SPAR magazin</span>
                <span class="flyer-teaser__valid">03.01. - 03.31.</span>
            </a>
        </div>
        <div class="flyer-teaser__teaser">
            <a class="flyer-teaser__teaser-inner" href="https://www.spar.hu/ajanlatok/broken">
                <img class="flyer-teaser__image" src="https://www.spar.hu/img/broken.jpg">
                <span class="flyer-teaser__caption">SPAR szórólap</span>
                <span class="flyer-teaser__valid">hamarosan</span>
            </a>
        </div>
    </div></body></html>"#;

    #[test]
    fn test_parse_flyers_keeps_leaflets_only() {
        let catalogs = parse_flyers(PAGE, now());
        assert_eq!(catalogs.len(), 1);

        let catalog = &catalogs[0];
        assert_eq!(catalog.url, "https://www.spar.hu/ajanlatok/szorolap-0306");
        assert_eq!(catalog.title.as_deref(), Some("SPAR szórólap"));
        assert_eq!(catalog.image_url.as_deref(), Some("https://www.spar.hu/img/0306.jpg"));
        assert_eq!(catalog.valid_from.unwrap().to_string(), "2025-03-06 00:00:00");
        assert_eq!(catalog.valid_to.unwrap().to_string(), "2025-03-12 00:00:00");
        assert_eq!(catalog.last_updated, Some(now()));
    }

    #[test]
    fn test_validity_range() {
        assert!(validity_range("12.30.-01.05.", 2025).is_some());
        assert!(validity_range("02.30. - 03.05.", 2025).is_none());
        assert!(validity_range("no dates", 2025).is_none());
    }

    #[test]
    fn test_validity_range_on_many_labels() {
        for month in 1..=9 {
            let label = format!("Érvényes: {:02}.01. - {:02}.07.", month, month);
            let (from, to) = validity_range(&label, 2025).unwrap();
            assert_eq!(from.format("%m-%d").to_string(), format!("{:02}-01", month));
            assert_eq!(to.format("%m-%d").to_string(), format!("{:02}-07", month));
        }
    }
}
