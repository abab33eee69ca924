// src/extract/html.rs
// =============================================================================
// Pulls the report fields out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (forgiving: broken markup still gives a tree)
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to resolve relative hrefs/srcs to absolute URLs.
//
// Nothing in here can fail: missing elements give empty fields, and hrefs
// that don't resolve are skipped.
// =============================================================================

use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::PageRecord;

// Builds the PageRecord for one page
//
// Parameters:
//   html: the page body
//   page_url: where the page was fetched from (base for relative links)
pub fn extract_page_data(html: &str, page_url: &Url) -> PageRecord {
    // Parse once, query many times
    let document = Html::parse_document(html);

    PageRecord {
        url: page_url.to_string(),
        h1: first_h1(&document),
        first_paragraph: first_paragraph(&document),
        outgoing_links: collect_urls(&document, &LINKS, "href", page_url),
        image_urls: collect_urls(&document, &IMAGES, "src", page_url),
    }
}

// Parsed once per process; the CSS is constant, so parsing can't fail
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static MAIN: LazyLock<Selector> = LazyLock::new(|| selector("main"));
static P: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static IMAGES: LazyLock<Selector> = LazyLock::new(|| selector("img[src]"));

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("constant CSS selector")
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_h1(document: &Html) -> String {
    document
        .select(&H1)
        .next()
        .map(text_of)
        .unwrap_or_default()
}

// Prefers the first <p> inside <main>; falls back to the first <p> anywhere
fn first_paragraph(document: &Html) -> String {
    let in_main = document
        .select(&MAIN)
        .next()
        .and_then(|main| main.select(&P).next());

    in_main
        .or_else(|| document.select(&P).next())
        .map(text_of)
        .unwrap_or_default()
}

fn collect_urls(document: &Html, selector: &Selector, attr: &str, base: &Url) -> BTreeSet<String> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .filter_map(|value| resolve_link(base, value))
        .collect()
}

// Resolves a link (possibly relative) to an absolute URL
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    // Skip empty values, in-page anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!(href, error = %e, "Skipping unresolvable link");
            None
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why ElementRef::text()?
//    - It walks every text node under the element, like textContent in a
//      browser, so <h1>Hello <em>world</em></h1> gives "Hello world"
//
// 2. Why base.join() for everything?
//    - join() leaves absolute URLs alone and resolves relative ones, so
//      "/docs", "../about" and "https://other.com" all come out absolute
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://blog.boot.dev/path/").unwrap()
    }

    #[test]
    fn test_h1_basic() {
        let page = extract_page_data("<html><body><h1>Test Title</h1></body></html>", &base());
        assert_eq!(page.h1, "Test Title");
    }

    #[test]
    fn test_h1_missing() {
        let page = extract_page_data("<html><body><p>no heading</p></body></html>", &base());
        assert_eq!(page.h1, "");
    }

    #[test]
    fn test_h1_first_of_many_with_nested_markup() {
        let html = "<h1>Hello <em>world</em></h1><h1>Second</h1>";
        assert_eq!(extract_page_data(html, &base()).h1, "Hello world");
    }

    #[test]
    fn test_first_paragraph_prefers_main() {
        let html = r#"
            <html><body>
                <p>Outside paragraph.</p>
                <main><p>Main paragraph.</p></main>
            </body></html>
        "#;
        assert_eq!(extract_page_data(html, &base()).first_paragraph, "Main paragraph.");
    }

    #[test]
    fn test_first_paragraph_without_main() {
        let html = "<body><p>First</p><p>Second</p></body>";
        assert_eq!(extract_page_data(html, &base()).first_paragraph, "First");
    }

    #[test]
    fn test_first_paragraph_main_without_p_falls_back() {
        let html = "<body><main><div>no p here</div></main><p>Fallback</p></body>";
        assert_eq!(extract_page_data(html, &base()).first_paragraph, "Fallback");
    }

    #[test]
    fn test_links_resolved_against_page() {
        let html = r#"
            <a href="https://www.rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
            <a href="child">Child</a>
        "#;
        let page = extract_page_data(html, &base());
        let expected: BTreeSet<String> = [
            "https://www.rust-lang.org/",
            "https://blog.boot.dev/docs",
            "https://blog.boot.dev/about",
            "https://blog.boot.dev/path/child",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(page.outgoing_links, expected);
    }

    #[test]
    fn test_skip_special_links() {
        let html = r##"
            <a href="#section">Anchor</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:12345">Call</a>
            <a href="javascript:void(0)">JS</a>
            <a>No href</a>
        "##;
        assert!(extract_page_data(html, &base()).outgoing_links.is_empty());
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let html = r#"<a href="/a">1</a><a href="/a">2</a><a href="https://blog.boot.dev/a">3</a>"#;
        assert_eq!(extract_page_data(html, &base()).outgoing_links.len(), 1);
    }

    #[test]
    fn test_images_resolved() {
        let html = r#"<img src="/logo.png" alt="Logo"><img src="https://cdn.example.com/x.jpg"><img alt="no src">"#;
        let page = extract_page_data(html, &base());
        assert!(page.image_urls.contains("https://blog.boot.dev/logo.png"));
        assert!(page.image_urls.contains("https://cdn.example.com/x.jpg"));
        assert_eq!(page.image_urls.len(), 2);
    }

    #[test]
    fn test_selectors_reused_across_pages() {
        // The shared selectors must not carry state from one page to the next
        let first = extract_page_data("<h1>One</h1><a href='/one'>1</a>", &base());
        let second = extract_page_data("<h1>Two</h1><img src='/two.png'>", &base());

        assert_eq!(first.h1, "One");
        assert!(first.image_urls.is_empty());
        assert_eq!(second.h1, "Two");
        assert!(second.outgoing_links.is_empty());
        assert!(second.image_urls.contains("https://blog.boot.dev/two.png"));
    }

    #[test]
    fn test_constant_selectors_parse() {
        for css in ["h1", "main", "p", "a[href]", "img[src]"] {
            assert!(Selector::parse(css).is_ok(), "{}", css);
        }
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let html = "<html><h1>Broken<p>unclosed <a href='/x'>link";
        let page = extract_page_data(html, &base());
        assert_eq!(page.url, "https://blog.boot.dev/path/");
        assert!(page.outgoing_links.contains("https://blog.boot.dev/x"));
    }
}
