//! Ranking report of a single run

use crate::crawler::CrawlStats;
use crate::index::LinkIndex;
use crate::rank::{rank_pages, PageRankResult, RankedPage};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a run produced, ready to be printed
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    /// Canonical seed URL
    pub seed: String,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When ranking finished
    pub finished_at: DateTime<Utc>,

    /// Power-iteration count
    pub iterations: usize,

    /// Final L1 error
    pub error: f64,

    /// Pages, highest rank first
    pub pages: Vec<RankedPage>,

    /// Crawl counters
    pub crawl: CrawlStats,
}

impl RankingReport {
    /// Builds the report from a solved index
    ///
    /// `index` must be in the order the matrix was built from.
    pub fn new(
        seed: impl Into<String>,
        started_at: DateTime<Utc>,
        index: &LinkIndex,
        result: &PageRankResult,
        epsilon: f64,
        crawl: CrawlStats,
    ) -> Self {
        Self {
            seed: seed.into(),
            started_at,
            finished_at: Utc::now(),
            iterations: result.iterations,
            error: result.error,
            pages: rank_pages(index, result, epsilon),
            crawl,
        }
    }

    /// Sum of all reported ranks
    pub fn total_rank(&self) -> f64 {
        self.pages.iter().map(|p| p.page_rank).sum()
    }
}
