// Site generation: combined data/index.json for the viewer and the index.html catalog table.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{info, warn};

use super::index_store::{write_json, IndexStore};
use super::model::{ListedCatalog, Store};
use crate::config::{DATA_DIR, DATA_INDEX_PATH};

/// Human-readable validity period, e.g. `2025 01-02 → 01-08` or
/// `2024 12-30 → 2025 01-05` when the period crosses a year.
pub fn format_date_range(from: NaiveDateTime, to: NaiveDateTime) -> String {
    if from.year() == to.year() {
        format!("{} {} → {}", from.year(), from.format("%m-%d"), to.format("%m-%d"))
    } else {
        format!("{} → {}", from.format("%Y %m-%d"), to.format("%Y %m-%d"))
    }
}

/// All dated catalogs of `stores`, annotated for display, newest first.
pub fn list_catalogs(index: &IndexStore, stores: &[Store], now: NaiveDateTime) -> Result<Vec<ListedCatalog>> {
    let today = now.date();
    let mut listed = Vec::new();
    for &store in stores {
        for catalog in index.load(store)? {
            let (Some(from), Some(to)) = (catalog.valid_from, catalog.valid_to) else {
                warn!("skipping {} catalog without dates: {}", store, catalog.url);
                continue;
            };
            listed.push(ListedCatalog {
                is_active: catalog.is_active_on(today),
                date_range: format_date_range(from, to),
                store,
                store_logo: store.logo_path(),
                catalog,
            });
        }
    }
    listed.sort_by(|a, b| b.catalog.valid_from.cmp(&a.catalog.valid_from));
    Ok(listed)
}

/// Build `data/index.json` and `index.html` under `site_dir`.
/// Returns the number of catalogs listed.
pub fn generate_site(site_dir: &Path, stores: &[Store], now: NaiveDateTime) -> Result<usize> {
    let index = IndexStore::new(site_dir.join(DATA_DIR));
    let listed = list_catalogs(&index, stores, now)?;

    write_json(&site_dir.join(DATA_INDEX_PATH), &listed)?;

    let html_path = site_dir.join("index.html");
    fs::write(&html_path, render_index_html(&listed, now))
        .with_context(|| format!("failed to write {}", html_path.display()))?;

    info!("generated index.html with {} catalogs", listed.len());
    Ok(listed.len())
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en" class="bg-gray-100">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="robots" content="noindex, nofollow">
    <meta name="googlebot" content="noindex, nofollow">
    <title>Store Catalogs</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="min-h-screen p-4 md:p-8">
    <div class="max-w-7xl mx-auto space-y-8">
        <div class="bg-white rounded-lg shadow overflow-hidden">
            <div class="overflow-x-auto">
                <table class="min-w-full divide-y divide-gray-200">
                    <thead class="bg-gray-50">
                        <tr>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">Store</th>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">Valid Period</th>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">Link</th>
                        </tr>
                    </thead>
                    <tbody class="bg-white divide-y divide-gray-200">
"#;

/// Render the catalog table page.
pub fn render_index_html(catalogs: &[ListedCatalog], generated_at: NaiveDateTime) -> String {
    let mut html = String::with_capacity(PAGE_HEAD.len() + catalogs.len() * 1200 + 512);
    html.push_str(PAGE_HEAD);

    for listed in catalogs {
        let (row_class, button_class) = if listed.is_active {
            ("hover:bg-green-50", "bg-green-600 hover:bg-green-700 focus:ring-green-500")
        } else {
            ("hover:bg-gray-50", "bg-blue-600 hover:bg-blue-700 focus:ring-blue-500")
        };
        let store = listed.store.name();

        html.push_str(&format!("                        <tr class=\"{}\">\n", row_class));
        html.push_str("                            <td class=\"px-6 py-4 whitespace-nowrap\">\n");
        html.push_str("                                <div class=\"flex items-center\">\n");
        html.push_str("                                    <div class=\"flex-shrink-0 h-8 w-8\">\n");
        html.push_str(&format!(
            "                                        <img class=\"h-8 w-8 object-contain\" src=\"{}\" alt=\"{}\">\n",
            encode_double_quoted_attribute(&listed.store_logo),
            store
        ));
        html.push_str("                                    </div>\n");
        html.push_str("                                    <div class=\"ml-4\">\n");
        html.push_str(&format!(
            "                                        <div class=\"text-sm font-medium text-gray-900\">{}</div>\n",
            store
        ));
        html.push_str("                                    </div>\n");
        html.push_str("                                </div>\n");
        html.push_str("                            </td>\n");
        html.push_str("                            <td class=\"px-6 py-4 whitespace-nowrap\">\n");
        html.push_str(&format!(
            "                                <div class=\"text-sm text-gray-900\">{}</div>\n",
            encode_text(&listed.date_range)
        ));
        html.push_str("                            </td>\n");
        html.push_str("                            <td class=\"px-6 py-4 whitespace-nowrap text-sm\">\n");
        html.push_str(&format!(
            "                                <a href=\"{}\" target=\"_blank\" class=\"inline-flex items-center px-3 py-2 border border-transparent text-sm leading-4 font-medium rounded-md text-white {} focus:outline-none focus:ring-2 focus:ring-offset-2\">View</a>\n",
            encode_double_quoted_attribute(&listed.catalog.url),
            button_class
        ));
        html.push_str("                            </td>\n");
        html.push_str("                        </tr>\n");
    }

    html.push_str("                    </tbody>\n");
    html.push_str("                </table>\n");
    html.push_str("            </div>\n");
    html.push_str("        </div>\n\n");
    html.push_str(&format!(
        "        <div class=\"text-center text-sm text-gray-500\">\n            Last updated: {}\n        </div>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    html.push_str("    </div>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Catalog;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_format_date_range() {
        assert_eq!(format_date_range(at(2025, 1, 2), at(2025, 1, 8)), "2025 01-02 → 01-08");
        assert_eq!(
            format_date_range(at(2024, 12, 30), at(2025, 1, 5)),
            "2024 12-30 → 2025 01-05"
        );
    }

    #[test]
    fn test_list_catalogs_annotates_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let index = IndexStore::new(dir.path());
        index
            .update(Store::Aldi, vec![Catalog::new("aldi-1", at(2025, 1, 2), at(2025, 1, 8))])
            .unwrap();
        index
            .update(Store::Lidl, vec![Catalog::new("lidl-1", at(2025, 1, 9), at(2025, 1, 15))])
            .unwrap();

        let now = at(2025, 1, 10);
        let listed = list_catalogs(&index, &[Store::Aldi, Store::Lidl], now).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].catalog.url, "lidl-1");
        assert_eq!(listed[0].store, Store::Lidl);
        assert_eq!(listed[0].store_logo, "images/LIDL.png");
        assert!(listed[0].is_active);
        assert!(!listed[1].is_active);
        assert_eq!(listed[1].date_range, "2025 01-02 → 01-08");
    }

    #[test]
    fn test_listed_catalog_json_shape() {
        let listed = ListedCatalog {
            catalog: Catalog::new("u", at(2025, 1, 2), at(2025, 1, 8)),
            store: Store::Aldi,
            store_logo: Store::Aldi.logo_path(),
            is_active: true,
            date_range: "2025 01-02 → 01-08".to_string(),
        };
        let json = serde_json::to_value(&listed).unwrap();
        assert_eq!(json["url"], "u");
        assert_eq!(json["store"], "ALDI");
        assert_eq!(json["store_logo"], "images/ALDI.png");
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_render_marks_active_rows() {
        let listed = vec![
            ListedCatalog {
                catalog: Catalog::new("https://x.test/?a=1&b=2", at(2025, 1, 9), at(2025, 1, 15)),
                store: Store::Lidl,
                store_logo: Store::Lidl.logo_path(),
                is_active: true,
                date_range: "2025 01-09 → 01-15".to_string(),
            },
            ListedCatalog {
                catalog: Catalog::new("https://y.test/", at(2025, 1, 2), at(2025, 1, 8)),
                store: Store::Aldi,
                store_logo: Store::Aldi.logo_path(),
                is_active: false,
                date_range: "2025 01-02 → 01-08".to_string(),
            },
        ];
        let html = render_index_html(&listed, at(2025, 1, 10));
        assert!(html.contains("<tr class=\"hover:bg-green-50\">"));
        assert!(html.contains("<tr class=\"hover:bg-gray-50\">"));
        assert!(html.contains("href=\"https://x.test/?a=1&amp;b=2\""));
        assert!(html.contains("src=\"images/ALDI.png\" alt=\"ALDI\""));
        assert!(html.contains("Last updated: 2025-01-10 00:00:00"));
        assert!(html.contains("<meta name=\"robots\" content=\"noindex, nofollow\">"));
    }

    #[test]
    fn test_generate_site_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let index = IndexStore::new(dir.path().join("data"));
        index
            .update(Store::Aldi, vec![Catalog::new("aldi-1", at(2025, 1, 2), at(2025, 1, 8))])
            .unwrap();

        let count = generate_site(dir.path(), &[Store::Aldi, Store::Lidl], at(2025, 1, 3)).unwrap();
        assert_eq!(count, 1);

        let data = std::fs::read_to_string(dir.path().join("data/index.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value[0]["store"], "ALDI");
        assert_eq!(value[0]["date_range"], "2025 01-02 → 01-08");
        assert!(dir.path().join("index.html").exists());
    }
}
