//! Crawler module: produces the documents the link index is built from
//!
//! This module contains the crawl driver, including:
//! - HTTP fetching and Content-Type filtering
//! - The breadth-first frontier
//! - Overall crawl coordination
//! - The single indexing task that consumes fetched documents

mod coordinator;
mod fetcher;
mod frontier;

pub use coordinator::{Coordinator, CrawlStats, StopReason};
pub use fetcher::{build_http_client, fetch_url, is_html, FetchResult};
pub use frontier::{Frontier, QueuedUrl};

use crate::config::Config;
use crate::index::{Document, LinkIndex};
use crate::RankError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Builds a link index from a stream of documents
///
/// This is the only writer of the index: documents arrive one at a time
/// over the channel and are pushed in arrival order. The index is returned
/// once every sender has been dropped.
///
/// # Errors
///
/// * `RankError::DuplicateDocument` - the same URL arrived twice. The
///   receiver is dropped, which stops the producer.
pub async fn index_documents(mut rx: mpsc::Receiver<Document>) -> Result<LinkIndex, RankError> {
    let mut index = LinkIndex::new();

    while let Some(doc) = rx.recv().await {
        index.push(doc)?;
    }

    tracing::info!(
        "Indexed {} pages with {} outbound links",
        index.len(),
        index.link_count()
    );

    Ok(index)
}

/// Crawls the site of `seed` and returns the finished link index
///
/// This is the main entry point for crawling. It will:
/// 1. Build the coordinator (seed canonicalisation, HTTP client)
/// 2. Spawn the indexing task behind a bounded channel
/// 3. Run the crawl until the frontier or page budget is exhausted
/// 4. Close the channel and wait for the index
///
/// # Example
///
/// ```no_run
/// use sumi_rank::config::Config;
/// use sumi_rank::crawler::crawl_site;
/// use std::sync::atomic::AtomicBool;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), sumi_rank::RankError> {
/// let cancel = Arc::new(AtomicBool::new(false));
/// let (index, stats) = crawl_site("https://example.com/", &Config::default(), cancel).await?;
/// println!("{} pages from {} requests", index.len(), stats.requests);
/// # Ok(())
/// # }
/// ```
pub async fn crawl_site(
    seed: &str,
    config: &Config,
    cancel: Arc<AtomicBool>,
) -> Result<(LinkIndex, CrawlStats), RankError> {
    let coordinator = Coordinator::new(seed, config)?.with_cancel_flag(cancel);

    let (tx, rx) = mpsc::channel(config.crawler.channel_capacity);
    let indexer = tokio::spawn(index_documents(rx));

    let stats = coordinator.run(tx).await;

    let index = indexer
        .await
        .map_err(|e| RankError::Indexer(e.to_string()))??;

    Ok((index, stats))
}
