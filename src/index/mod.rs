//! Link graph indexing
//!
//! This module turns fetched documents into the directed link graph that
//! ranking runs on:
//! - Link extraction from HTML bodies
//! - The append-only link index (page URL → outbound targets)

mod extractor;
mod link_index;

pub use extractor::extract_links;
pub use link_index::LinkIndex;

use std::collections::BTreeSet;

/// A fetched HTML page, consumed once by [`LinkIndex::push`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Canonical URL the page was fetched from
    pub url: String,

    /// Response body
    pub body: String,

    /// Outbound links already extracted from `body`, if any
    pub(crate) links: Option<BTreeSet<String>>,
}

impl Document {
    /// Creates a new document
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            links: None,
        }
    }

    /// Creates a document whose links were already extracted from `body`
    ///
    /// The crawler parses every page once to follow its links; handing
    /// those links over spares the index a second parse of the same body.
    pub(crate) fn with_links(
        url: impl Into<String>,
        body: impl Into<String>,
        links: BTreeSet<String>,
    ) -> Self {
        Self {
            links: Some(links),
            ..Self::new(url, body)
        }
    }
}

/// Builds a document whose body links to each of `targets`
#[cfg(test)]
pub(crate) fn document_linking(url: &str, targets: &[&str]) -> Document {
    let anchors: String = targets
        .iter()
        .map(|t| format!(r#"<a href="{}">{}</a>"#, t, t))
        .collect();
    Document::new(url, format!("<html><body>{}</body></html>", anchors))
}
