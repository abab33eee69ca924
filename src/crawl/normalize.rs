// src/crawl/normalize.rs
// =============================================================================
// Turns a URL into the key we use to decide "have we seen this page already?"
//
// The key is host + path, lower-cased, with one trailing slash removed:
//   https://Example.com/Docs/   ->  example.com/docs
//   http://example.com/docs     ->  example.com/docs
//
// Scheme, query string and fragment are dropped on purpose: for crawl
// purposes those all point at the same page.
// =============================================================================

use tracing::warn;
use url::Url;

// Normalizes a URL string into a deduplication key
//
// Returns an empty string when the input can't be parsed or has no host.
// Callers must treat "" as "do not crawl this".
pub fn normalize_url(url_string: &str) -> String {
    let url = match Url::parse(url_string) {
        Ok(url) => url,
        Err(e) => {
            warn!(url = url_string, error = %e, "Invalid URL");
            return String::new();
        }
    };

    normalize_parsed(&url).unwrap_or_else(|| {
        warn!(url = url_string, "Invalid URL: missing host or path");
        String::new()
    })
}

// Same as normalize_url, for a URL that is already parsed
pub fn normalize_parsed(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    let path = url.path();
    if path.is_empty() {
        return None;
    }

    let path = path.strip_suffix('/').unwrap_or(path);
    Some(format!("{}{}", host, path).to_lowercase())
}
