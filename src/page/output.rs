use anyhow::{anyhow, Result};
use parking_lot::RwLock;

use crate::config::CONTENT_ELEMENT_ID;

/// A surface whose regions can be replaced by element id.
pub trait OutputSink: Send + Sync {
    /// Replace the whole content of `element_id` with `html`.
    fn replace_content(&self, element_id: &str, html: &str) -> Result<()>;
}

/// In-memory HTML page made of ordered, addressable regions.
pub struct Page {
    title: String,
    regions: RwLock<Vec<(String, String)>>,
}

impl Page {
    pub fn new(title: impl Into<String>, element_ids: &[&str]) -> Self {
        let regions = element_ids
            .iter()
            .map(|id| (id.to_string(), String::new()))
            .collect();
        Self {
            title: title.into(),
            regions: RwLock::new(regions),
        }
    }

    /// The viewer page: a single empty `content` region.
    pub fn viewer() -> Self {
        Self::new("Store Catalogs", &[CONTENT_ELEMENT_ID])
    }

    /// Current content of a region, or `None` if the page has no such element.
    pub fn content(&self, element_id: &str) -> Option<String> {
        self.regions
            .read()
            .iter()
            .find(|(id, _)| id == element_id)
            .map(|(_, html)| html.clone())
    }

    /// Render the page as a standalone HTML document.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(1024);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(&format!(
            "    <title>{}</title>\n",
            html_escape::encode_text(&self.title)
        ));
        html.push_str("</head>\n<body>\n");
        for (id, content) in self.regions.read().iter() {
            html.push_str(&format!(
                "    <div id=\"{}\">{}</div>\n",
                html_escape::encode_double_quoted_attribute(id),
                content
            ));
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

impl OutputSink for Page {
    fn replace_content(&self, element_id: &str, html: &str) -> Result<()> {
        let mut regions = self.regions.write();
        let region = regions
            .iter_mut()
            .find(|(id, _)| id == element_id)
            .ok_or_else(|| anyhow!("no element with id '{}'", element_id))?;
        region.1 = html.to_string();
        Ok(())
    }
}
