// src/extract/mod.rs
// =============================================================================
// This module turns a downloaded HTML page into a PageRecord:
// its first <h1>, its first paragraph, the links it points to and the
// images it shows.
//
// Links and image sources are resolved against the page's own URL, so
// everything stored here is absolute.
// =============================================================================

mod html;

use std::collections::BTreeSet;

pub use html::extract_page_data;

/// Everything we keep about one crawled page
///
/// BTreeSet keeps links sorted, so the report comes out the same every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    /// The URL the page was fetched from
    pub url: String,
    /// Text of the first <h1>, empty if there is none
    pub h1: String,
    /// Text of the first <p> (preferring one inside <main>)
    pub first_paragraph: String,
    pub outgoing_links: BTreeSet<String>,
    pub image_urls: BTreeSet<String>,
}
