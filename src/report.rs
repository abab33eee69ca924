// src/report.rs
// =============================================================================
// Writes the crawl results to a CSV file.
//
// One row per page, sorted by normalized key:
//   page_url, h1, first_paragraph, outgoing_link_urls, image_urls
//
// Multi-valued columns are joined with ';'. Quoting of commas, quotes and
// newlines is left to the csv crate.
// =============================================================================

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::extract::PageRecord;

// One CSV row; field names become the header
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    page_url: &'a str,
    h1: &'a str,
    first_paragraph: &'a str,
    outgoing_link_urls: String,
    image_urls: String,
}

impl<'a> From<&'a PageRecord> for ReportRow<'a> {
    fn from(page: &'a PageRecord) -> Self {
        Self {
            page_url: &page.url,
            h1: &page.h1,
            first_paragraph: &page.first_paragraph,
            outgoing_link_urls: join(&page.outgoing_links),
            image_urls: join(&page.image_urls),
        }
    }
}

fn join(urls: &BTreeSet<String>) -> String {
    urls.iter().map(String::as_str).collect::<Vec<_>>().join(";")
}

// Writes the report, returning the path written to
//
// Returns Ok(None) without creating a file when there are no pages.
pub fn write_csv_report(pages: &HashMap<String, PageRecord>, path: &Path) -> Result<Option<PathBuf>> {
    if pages.is_empty() {
        warn!("No page data to write to CSV report");
        return Ok(None);
    }

    let mut keys: Vec<&String> = pages.keys().collect();
    keys.sort();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for key in keys {
        writer.serialize(ReportRow::from(&pages[key]))?;
    }
    writer.flush()?;

    let written = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    info!(path = %written.display(), rows = pages.len(), "CSV report written");
    Ok(Some(written))
}
