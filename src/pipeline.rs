//! Crawl-then-rank run
//!
//! Ties the crawler, the link index and the solver together the way the
//! command-line tool runs them, with interrupt handling that lets a stopped
//! crawl still be ranked.

use crate::config::Config;
use crate::crawler::crawl_site;
use crate::output::RankingReport;
use crate::rank::{PageRankSolver, TransitionMatrix};
use crate::url::canonicalize_url;
use crate::RankError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Stop flags for the two phases of a run
///
/// The crawl and the solver watch different flags. Interrupting a run that
/// is still crawling only stops the crawl, so the pages fetched so far are
/// still ranked; interrupting it again (or once ranking has started)
/// cancels the solver.
#[derive(Debug, Clone, Default)]
pub struct Interrupts {
    crawl: Arc<AtomicBool>,
    solve: Arc<AtomicBool>,
    ranking: Arc<AtomicBool>,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag watched by the crawler
    pub fn crawl_flag(&self) -> Arc<AtomicBool> {
        self.crawl.clone()
    }

    /// Flag watched by the solver
    pub fn solve_flag(&self) -> Arc<AtomicBool> {
        self.solve.clone()
    }

    /// Handles one interrupt request
    ///
    /// Returns true if the solver was cancelled, false if only the crawl was
    /// stopped.
    pub fn interrupt(&self) -> bool {
        let crawl_already_stopped = self.crawl.swap(true, Ordering::Relaxed);

        if crawl_already_stopped || self.ranking.load(Ordering::Relaxed) {
            self.solve.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    fn start_ranking(&self) {
        self.ranking.store(true, Ordering::Relaxed);
    }
}

/// Crawls the site of `seed` and ranks every page that was indexed
///
/// # Errors
///
/// * Any error of [`crawl_site`]
/// * `RankError::EmptyGraph` - no HTML page was indexed
/// * `RankError::InvalidParameter` - bad PageRank settings
/// * `RankError::ConvergenceTimeout` / `RankError::Cancelled` - from the solver
pub async fn rank_site(
    seed: &str,
    config: &Config,
    interrupts: &Interrupts,
) -> Result<RankingReport, RankError> {
    let started_at = chrono::Utc::now();

    let (mut index, stats) = crawl_site(seed, config, interrupts.crawl_flag()).await?;
    interrupts.start_ranking();

    index.sort_urls();
    let matrix = TransitionMatrix::from_index(&index)?;

    let settings = &config.pagerank;
    let solver = PageRankSolver::new(settings.alpha, settings.epsilon)?
        .with_max_iterations(settings.max_iterations)?
        .with_cancel_flag(interrupts.solve_flag());

    tracing::info!(
        "Ranking {} pages (alpha {}, epsilon {})",
        matrix.dimension(),
        solver.alpha(),
        solver.epsilon()
    );

    let result = solver.solve_with(&matrix, |iteration, _, error| {
        tracing::debug!("Iteration {}: error {:e}", iteration, error);
    })?;

    tracing::info!(
        "PageRank converged after {} iterations (error {:e})",
        result.iterations,
        result.error
    );

    let seed = canonicalize_url(seed)
        .map(String::from)
        .unwrap_or_else(|_| seed.to_string());

    Ok(RankingReport::new(
        seed,
        started_at,
        &index,
        &result,
        settings.epsilon,
        stats,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interrupt_only_stops_crawl() {
        let interrupts = Interrupts::new();

        assert!(!interrupts.interrupt());
        assert!(interrupts.crawl_flag().load(Ordering::Relaxed));
        assert!(!interrupts.solve_flag().load(Ordering::Relaxed));
    }

    #[test]
    fn test_second_interrupt_cancels_solver() {
        let interrupts = Interrupts::new();
        interrupts.interrupt();

        assert!(interrupts.interrupt());
        assert!(interrupts.solve_flag().load(Ordering::Relaxed));
    }

    #[test]
    fn test_interrupt_while_ranking_cancels_solver() {
        let interrupts = Interrupts::new();
        interrupts.start_ranking();

        assert!(interrupts.interrupt());
        assert!(interrupts.solve_flag().load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_stopped_crawl_has_nothing_to_rank() {
        let interrupts = Interrupts::new();
        interrupts.interrupt();

        let result = rank_site("https://example.com/", &Config::default(), &interrupts).await;
        assert!(matches!(result, Err(RankError::EmptyGraph)));
    }
}
