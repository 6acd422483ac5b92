//! HTML link extraction
//!
//! Extraction is a pure function of the page URL and body: no network
//! access and no state.

use crate::url::canonicalize;
use crate::RankError;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Extracts the outbound hyperlink targets of a page
///
/// # Extraction Rules
///
/// - Every `<a href="...">` in the document is considered
/// - Each href is resolved against `page_url` (relative, protocol-relative
///   and fragment hrefs all resolve against the page) and canonicalised
/// - Links back to the page itself are dropped, including `#fragment` links
/// - Only `http` and `https` targets are kept
/// - Duplicates collapse; the set is ordered only for determinism
///
/// # Arguments
///
/// * `page_url` - Absolute URL of the page, used as the resolution base
/// * `body` - The HTML content
///
/// # Returns
///
/// * `Ok(BTreeSet<String>)` - Canonical absolute URLs of the outbound links
/// * `Err(RankError::HtmlParse)` - The page URL cannot serve as a base
///
/// HTML parsing itself is error tolerant: malformed markup yields whatever
/// anchors the parser recovers, never an error.
///
/// # Example
///
/// ```
/// use sumi_rank::index::extract_links;
///
/// let html = r##"<a href="/about">About</a><a href="#top">Top</a><a href="mailto:x@y.z">Mail</a>"##;
/// let links = extract_links("https://example.com/", html).unwrap();
/// assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["https://example.com/about"]);
/// ```
pub fn extract_links(page_url: &str, body: &str) -> Result<BTreeSet<String>, RankError> {
    let parse_error = |message: String| RankError::HtmlParse {
        url: page_url.to_string(),
        message,
    };

    let base = Url::parse(page_url).map_err(|e| parse_error(format!("invalid page URL: {}", e)))?;
    let page_key = canonicalize(base.clone())
        .map_err(|e| parse_error(format!("page URL cannot be a link base: {}", e)))?
        .to_string();

    let anchor_selector = Selector::parse("a[href]")
        .map_err(|e| parse_error(format!("invalid anchor selector: {:?}", e)))?;

    let document = Html::parse_document(body);

    let links = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, &base))
        .filter(|target| *target != page_key)
        .collect();

    Ok(links)
}

/// Resolves an href against the page URL and canonicalises it
///
/// Returns None for hrefs that do not resolve, and for anything that is not
/// an http(s) URL once resolved (`javascript:`, `mailto:`, `tel:`, `data:`...).
fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let resolved = base.join(href.trim()).ok()?;
    canonicalize(resolved).ok().map(|url| url.to_string())
}
