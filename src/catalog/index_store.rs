// Per-store JSON index files under the site's data directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::error::Category;
use tracing::{debug, error, info, warn};

use super::model::{Catalog, Store};

pub struct IndexStore {
    data_dir: PathBuf,
}

impl IndexStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, store: Store) -> PathBuf {
        self.data_dir.join(format!("index-{}.json", store.file_stem()))
    }

    /// Load a store's catalogs. A missing file or one that is not valid JSON
    /// yields an empty list; well-formed JSON with bad entries is an error.
    pub fn load(&self, store: Store) -> Result<Vec<Catalog>> {
        let path = self.path_for(store);
        if !path.exists() {
            warn!("no index file found for {}", store);
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match serde_json::from_str::<Vec<Catalog>>(&raw) {
            Ok(catalogs) => {
                debug!("loaded {} existing catalogs from {}", catalogs.len(), path.display());
                Ok(catalogs)
            }
            Err(e) if matches!(e.classify(), Category::Syntax | Category::Eof) => {
                error!("error reading {}, starting fresh: {}", path.display(), e);
                Ok(Vec::new())
            }
            Err(e) => Err(e).with_context(|| format!("unexpected catalog entry in {}", path.display())),
        }
    }

    /// Merge freshly crawled catalogs into the store's index file.
    /// Returns the number of catalogs written.
    pub fn update(&self, store: Store, new_catalogs: Vec<Catalog>) -> Result<usize> {
        let path = self.path_for(store);
        info!("updating index file: {}", path.display());

        let existing = self.load(store)?;
        let merged = merge(existing, new_catalogs);

        info!("writing {} catalogs to index file", merged.len());
        write_json(&path, &merged)?;
        Ok(merged.len())
    }
}

/// Keep existing catalogs that were not re-crawled and still carry both
/// dates, add every new one, newest `valid_from` first. Undated entries sort last.
pub fn merge(existing: Vec<Catalog>, new_catalogs: Vec<Catalog>) -> Vec<Catalog> {
    let new_urls: HashSet<&str> = new_catalogs.iter().map(|c| c.url.as_str()).collect();

    let mut merged: Vec<Catalog> = existing
        .into_iter()
        .filter(|c| !new_urls.contains(c.url.as_str()) && c.has_dates())
        .collect();
    merged.extend(new_catalogs);

    merged.sort_by(|a, b| b.valid_from.cmp(&a.valid_from));
    merged
}

/// Write `value` as 2-space-indented JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
