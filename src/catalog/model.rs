use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Store chains with a catalog crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Store {
    Aldi,
    Lidl,
    Tesco,
    Spar,
}

impl Store {
    pub const ALL: [Store; 4] = [Store::Aldi, Store::Lidl, Store::Tesco, Store::Spar];

    /// Display name, also used for the logo file name.
    pub fn name(self) -> &'static str {
        match self {
            Store::Aldi => "ALDI",
            Store::Lidl => "LIDL",
            Store::Tesco => "TESCO",
            Store::Spar => "SPAR",
        }
    }

    /// Lower-case stem used in `index-<stem>.json`.
    pub fn file_stem(self) -> String {
        self.name().to_lowercase()
    }

    pub fn logo_path(self) -> String {
        format!("images/{}.png", self.name())
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Store {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Store::ALL
            .into_iter()
            .find(|store| store.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("unknown store: {}", s))
    }
}

/// One catalog (weekly leaflet) of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, with = "iso_datetime")]
    pub valid_from: Option<NaiveDateTime>,
    #[serde(default, with = "iso_datetime")]
    pub valid_to: Option<NaiveDateTime>,
    #[serde(default, with = "iso_datetime")]
    pub last_updated: Option<NaiveDateTime>,
}

impl Catalog {
    pub fn new(url: impl Into<String>, valid_from: NaiveDateTime, valid_to: NaiveDateTime) -> Self {
        Self {
            url: url.into(),
            title: None,
            image_url: None,
            valid_from: Some(valid_from),
            valid_to: Some(valid_to),
            last_updated: None,
        }
    }

    pub fn has_dates(&self) -> bool {
        self.valid_from.is_some() && self.valid_to.is_some()
    }

    /// Whether `today` falls inside the validity period (inclusive on both ends).
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        match (self.valid_from, self.valid_to) {
            (Some(from), Some(to)) => from.date() <= today && today <= to.date(),
            _ => false,
        }
    }
}

/// A catalog annotated for listing on the site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedCatalog {
    #[serde(flatten)]
    pub catalog: Catalog,
    pub store: Store,
    pub store_logo: String,
    pub is_active: bool,
    pub date_range: String,
}

/// ISO-8601 naive date-times, `null` when absent.
///
/// Reading is lenient: a bare `YYYY-MM-DD` or the legacy `YYYY.MM.DD` form
/// becomes midnight, and anything unparseable becomes `None`.
pub(crate) mod iso_datetime {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_str(&dt.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, FORMAT) {
            return Some(dt);
        }
        ["%Y-%m-%d", "%Y.%m.%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}
