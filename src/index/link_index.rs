//! Append-only registry of crawled pages and their outbound links

use crate::index::{extract_links, Document};
use crate::url::canonicalize_url;
use crate::RankError;
use std::collections::{BTreeSet, HashMap};

static NO_LINKS: BTreeSet<String> = BTreeSet::new();

/// Maps every crawled page to the set of URLs it links to
///
/// The index records pages in the order they were pushed (crawl completion
/// order) until [`LinkIndex::sort_urls`] re-orders them. The position of a
/// URL in [`LinkIndex::all_urls`] is its row and column in the transition
/// matrix, so the order must be settled before the matrix is built.
///
/// Link targets do not have to be pages of the index themselves: links to
/// pages that were never crawled are stored, but they get no matrix row and
/// no rank.
///
/// `push` takes `&mut self`; the crawler hands documents to a single owning
/// task, which keeps the duplicate check and the two-step insert atomic.
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    /// Indexed page URLs, in matrix order
    order: Vec<String>,

    /// Page URL → outbound link targets
    adjacency: HashMap<String, BTreeSet<String>>,
}

impl LinkIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a fetched document
    ///
    /// The page is keyed by the canonical form of `doc.url`, the same form
    /// link targets are stored in, so links to it always find its column.
    /// A URL that cannot be canonicalised is kept as given.
    ///
    /// Extracts the document's outbound links (unless the crawler already
    /// did), stores them under the page key and appends the key to the page
    /// order. A body whose links cannot be extracted is indexed with zero
    /// outbound links, so one bad page does not abort ranking of the rest.
    ///
    /// # Errors
    ///
    /// * `RankError::DuplicateDocument` - the page is already indexed. The
    ///   index is left unchanged.
    pub fn push(&mut self, doc: Document) -> Result<(), RankError> {
        let url = canonicalize_url(&doc.url)
            .map(String::from)
            .unwrap_or(doc.url);

        if self.adjacency.contains_key(&url) {
            return Err(RankError::DuplicateDocument { url });
        }

        let links = match doc.links {
            Some(links) => links,
            None => match extract_links(&url, &doc.body) {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!("Indexing {} with no outbound links: {}", url, e);
                    BTreeSet::new()
                }
            },
        };

        tracing::debug!("Indexed {} ({} outbound links)", url, links.len());

        self.order.push(url.clone());
        self.adjacency.insert(url, links);

        Ok(())
    }

    /// Returns the outbound links of a page, or an empty set if it was never pushed
    pub fn outbound_links(&self, url: &str) -> &BTreeSet<String> {
        self.adjacency.get(url).unwrap_or(&NO_LINKS)
    }

    /// Returns true if `url` links to `target`
    pub fn has_outlink(&self, url: &str, target: &str) -> bool {
        self.outbound_links(url).contains(target)
    }

    /// Number of distinct outbound links of a page, indexed or not
    pub fn out_degree(&self, url: &str) -> usize {
        self.outbound_links(url).len()
    }

    /// Indexed page URLs in matrix order
    pub fn all_urls(&self) -> &[String] {
        &self.order
    }

    /// Sorts the page order lexicographically
    ///
    /// This re-assigns matrix rows and columns, so call it before building
    /// the transition matrix and never after. Sorting twice is harmless.
    pub fn sort_urls(&mut self) {
        self.order.sort_unstable();
    }

    /// Full adjacency snapshot
    pub fn all_adjacency(&self) -> &HashMap<String, BTreeSet<String>> {
        &self.adjacency
    }

    /// Returns true if the page has been indexed
    pub fn contains(&self, url: &str) -> bool {
        self.adjacency.contains_key(url)
    }

    /// Number of indexed pages
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no page has been indexed
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of stored links, including links to unindexed pages
    pub fn link_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }
}
