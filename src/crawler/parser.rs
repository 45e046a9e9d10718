//! Link extraction for the crawl frontier
//!
//! Only `<a href>` links that resolve to the same origin as the crawl's base
//! URL are returned. Order follows the document and duplicates are kept, so the
//! list doubles as the page's outbound link record.

use crate::analysis::select_all;
use crate::url::is_same_origin;
use scraper::Html;
use url::Url;

/// Extracts same-origin links from a parsed document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` whose resolved URL shares scheme, host and port with
///   `base_url`
///
/// **Exclude:**
/// - Empty hrefs and hrefs starting with `#`
/// - hrefs that cannot be resolved against `current_url`
/// - Links to any other origin
///
/// # Example
///
/// ```no_run
/// use scraper::Html;
/// use seo_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="../about">About</a>"#);
/// let current = Url::parse("https://ex.com/blog/post").unwrap();
/// let base = Url::parse("https://ex.com/").unwrap();
/// assert_eq!(extract_links(&html, &current, &base), vec!["https://ex.com/about"]);
/// ```
pub fn extract_links(document: &Html, current_url: &Url, base_url: &Url) -> Vec<String> {
    select_all(document, "a[href]")
        .into_iter()
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, current_url))
        .filter(|resolved| is_same_origin(base_url, resolved))
        .map(String::from)
        .collect()
}

/// Parses `html` and extracts links in one step
///
/// Convenience wrapper for callers that do not already hold a parsed document.
pub fn extract_links_simple(html: &str, current_url: &Url, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    extract_links(&document, current_url, base_url)
}

/// Resolves an href against the page it appears on
///
/// Returns None for empty hrefs, fragment-only hrefs and anything `Url::join`
/// rejects.
fn resolve_link(href: &str, current_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    current_url.join(href).ok()
}
