//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that turns a seed URL into a stream
//! of fetched documents:
//! - Managing the frontier queue and the page budget
//! - Respecting robots.txt and request delays
//! - Running fetches concurrently, bounded by a semaphore
//! - Delivering HTML documents to the indexer and following their links

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::index::{extract_links, Document};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::{canonicalize, canonicalize_url, extract_domain, in_scope};
use crate::{RankError, UrlError};
use reqwest::Client;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use url::Url;

/// Upper bound on a robots.txt `Crawl-delay`
const MAX_CRAWL_DELAY_SECS: f64 = 60.0;

/// Why a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every reachable page was visited
    #[default]
    FrontierExhausted,
    /// `max-pages` requests were sent with URLs still queued
    PageBudget,
    /// The cancel flag was raised
    Cancelled,
    /// The indexer stopped accepting documents
    IndexerStopped,
}

/// Counters describing one crawl
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlStats {
    /// HTML documents delivered to the indexer
    pub pages_indexed: usize,

    /// Requests sent (the page budget counts these)
    pub requests: usize,

    /// Successful responses that were not HTML
    pub skipped_non_html: usize,

    /// Redirect responses
    pub redirects: usize,

    /// Non-success HTTP responses
    pub http_errors: usize,

    /// Transport failures
    pub network_errors: usize,

    /// URLs skipped because robots.txt disallows them
    pub robots_disallowed: usize,

    /// Wall-clock duration of the crawl
    pub elapsed_secs: f64,

    /// Why the crawl ended
    pub stop_reason: StopReason,
}

/// What a fetch task hands back to the coordinator
struct FetchOutcome {
    queued: QueuedUrl,
    result: FetchResult,
    /// Links of a fetched HTML body; `None` if extraction failed
    links: Option<BTreeSet<String>>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlerConfig,
    client: Client,
    seed: Url,
    seed_host: String,
    robots_agent: String,
    frontier: Frontier,
    robots: HashMap<String, ParsedRobots>,
    last_request: HashMap<String, Instant>,
    cancel: Arc<AtomicBool>,
    aborted: bool,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a new coordinator for the site of `seed`
    ///
    /// # Errors
    ///
    /// * `RankError::UrlError` - the seed is not an absolute http(s) URL
    /// * `RankError::Reqwest` - the HTTP client could not be built
    pub fn new(seed: &str, config: &Config) -> Result<Self, RankError> {
        let seed = canonicalize_url(seed)?;
        let seed_host = extract_domain(&seed).ok_or(UrlError::MissingDomain)?;
        let client = build_http_client(config)?;

        Ok(Self {
            config: config.crawler.clone(),
            client,
            frontier: Frontier::new(seed.clone()),
            seed,
            seed_host,
            robots_agent: config.user_agent.crawler_name.clone(),
            robots: HashMap::new(),
            last_request: HashMap::new(),
            cancel: Arc::new(AtomicBool::new(false)),
            aborted: false,
            stats: CrawlStats::default(),
        })
    }

    /// Shares a flag that stops the crawl when raised
    ///
    /// In-flight fetches still complete and their documents are delivered;
    /// nothing new is dispatched.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// The canonical seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Runs the crawl, sending every fetched HTML page to `tx`
    ///
    /// The sender is dropped when this returns, which tells the consumer the
    /// crawl is complete. If the consumer goes away the crawl stops early.
    pub async fn run(mut self, tx: mpsc::Sender<Document>) -> CrawlStats {
        tracing::info!("Starting crawl of {}", self.seed);

        let start_time = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_requests));
        let mut tasks: JoinSet<FetchOutcome> = JoinSet::new();
        let mut reported = 0;

        loop {
            // Dispatch as much as the budget allows; acquiring a permit waits
            // for an in-flight fetch to finish
            while !self.should_stop() && self.stats.requests < self.config.max_pages {
                let Some(queued) = self.frontier.next_url() else {
                    break;
                };

                let origin = queued.url.origin().ascii_serialization();
                let robots = self.robots_for(&origin, &queued.url).await;

                if !robots.is_allowed(queued.url.as_str(), &self.robots_agent) {
                    tracing::info!("URL {} disallowed by robots.txt", queued.url);
                    self.stats.robots_disallowed += 1;
                    continue;
                }

                let delay = self.request_delay(&robots);
                self.throttle(&origin, delay).await;

                let Ok(permit) = semaphore.clone().acquire_owned().await else {
                    break;
                };

                // The flag may have been raised while waiting for a permit
                if self.should_stop() {
                    break;
                }

                tracing::debug!("Fetching {} (depth {})", queued.url, queued.depth);
                self.stats.requests += 1;

                let client = self.client.clone();
                tasks.spawn(async move {
                    let _permit = permit;
                    let result = fetch_url(&client, &queued.url).await;
                    let links = match &result {
                        FetchResult::Success { body, .. } => {
                            extract_links(queued.url.as_str(), body).ok()
                        }
                        _ => None,
                    };
                    FetchOutcome {
                        queued,
                        result,
                        links,
                    }
                });
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined {
                Ok(outcome) => {
                    if !self.handle_outcome(outcome, &tx).await && !self.aborted {
                        tracing::error!("Indexer stopped receiving documents, aborting crawl");
                        self.aborted = true;
                    }
                }
                Err(e) => tracing::error!("Fetch task failed: {}", e),
            }

            // Progress reporting every 10 pages
            if self.stats.pages_indexed > reported && self.stats.pages_indexed % 10 == 0 {
                reported = self.stats.pages_indexed;
                let rate = reported as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages indexed, {} requests, {} in frontier, {:.2} pages/sec",
                    reported,
                    self.stats.requests,
                    self.frontier.len(),
                    rate
                );
            }
        }

        self.stats.stop_reason = self.stop_reason();
        match self.stats.stop_reason {
            StopReason::FrontierExhausted => tracing::info!("Frontier is empty, crawl complete"),
            StopReason::PageBudget => tracing::warn!(
                "Page budget of {} reached with {} URLs left in the frontier",
                self.config.max_pages,
                self.frontier.len()
            ),
            StopReason::Cancelled => tracing::warn!("Crawl cancelled, ranking the pages fetched so far"),
            StopReason::IndexerStopped => tracing::error!("Crawl aborted by the indexer"),
        }

        self.stats.elapsed_secs = start_time.elapsed().as_secs_f64();

        tracing::info!(
            "Crawl completed: {} pages indexed from {} requests in {:.2}s",
            self.stats.pages_indexed,
            self.stats.requests,
            self.stats.elapsed_secs
        );

        self.stats
    }

    /// Records a finished fetch and follows its links
    ///
    /// Returns false if the document could not be delivered.
    async fn handle_outcome(&mut self, outcome: FetchOutcome, tx: &mpsc::Sender<Document>) -> bool {
        let FetchOutcome {
            queued,
            result,
            links,
        } = outcome;

        match result {
            FetchResult::Success {
                status_code, body, ..
            } => {
                tracing::info!("Crawled: {} (HTTP {})", queued.url, status_code);

                let follow = if queued.depth < self.config.max_depth {
                    links.iter().flatten().filter_map(|l| Url::parse(l).ok()).collect()
                } else {
                    Vec::new()
                };

                let doc = match links {
                    Some(links) => Document::with_links(queued.url.as_str(), body, links),
                    None => Document::new(queued.url.as_str(), body),
                };

                if tx.send(doc).await.is_err() {
                    return false;
                }
                self.stats.pages_indexed += 1;

                for url in follow {
                    self.follow(url, queued.depth + 1);
                }
            }

            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("Skipping {}: Content-Type {:?}", queued.url, content_type);
                self.stats.skipped_non_html += 1;
            }

            FetchResult::Redirect {
                status_code,
                location,
            } => {
                tracing::debug!(
                    "Redirect {} -> {} (HTTP {})",
                    queued.url,
                    location,
                    status_code
                );
                self.stats.redirects += 1;

                match canonicalize(location) {
                    Ok(target) => self.follow(target, queued.depth),
                    Err(e) => tracing::debug!("Ignoring redirect from {}: {}", queued.url, e),
                }
            }

            FetchResult::HttpError { status_code } => {
                tracing::warn!("HTTP {} for {}", status_code, queued.url);
                self.stats.http_errors += 1;
            }

            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", queued.url, error);
                self.stats.network_errors += 1;
            }
        }

        true
    }

    /// Queues a URL if it belongs to the crawled site
    fn follow(&mut self, url: Url, depth: u32) {
        if !in_scope(&self.seed_host, &url, self.config.include_subdomains) {
            tracing::trace!("Not following off-site link {}", url);
            return;
        }

        self.frontier.enqueue(url, depth);
    }

    fn stop_reason(&self) -> StopReason {
        if self.aborted {
            StopReason::IndexerStopped
        } else if self.cancel.load(Ordering::Relaxed) {
            StopReason::Cancelled
        } else if !self.frontier.is_empty() {
            StopReason::PageBudget
        } else {
            StopReason::FrontierExhausted
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.aborted || self.cancel.load(Ordering::Relaxed) {
            if !self.frontier.is_empty() {
                tracing::warn!(
                    "Crawl cancelled with {} URLs left in the frontier",
                    self.frontier.len()
                );
                self.frontier.clear();
            }
            return true;
        }
        false
    }

    /// Returns the robots.txt policy for an origin, fetching it on first use
    async fn robots_for(&mut self, origin: &str, url: &Url) -> ParsedRobots {
        if !self.config.respect_robots_txt {
            return ParsedRobots::allow_all();
        }

        if let Some(robots) = self.robots.get(origin) {
            return robots.clone();
        }

        let robots = fetch_robots(&self.client, url).await;
        self.robots.insert(origin.to_string(), robots.clone());
        robots
    }

    /// Delay between request starts: the configured delay or the robots.txt
    /// crawl delay, whichever is longer
    fn request_delay(&self, robots: &ParsedRobots) -> Duration {
        let configured = Duration::from_millis(self.config.request_delay_ms);

        let requested = if self.config.respect_robots_txt {
            robots
                .crawl_delay(&self.robots_agent)
                .map(|secs| Duration::from_secs_f64(secs.min(MAX_CRAWL_DELAY_SECS)))
                .unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };

        configured.max(requested)
    }

    /// Sleeps until `delay` has passed since the last request to `origin`
    async fn throttle(&mut self, origin: &str, delay: Duration) {
        if let Some(last) = self.last_request.get(origin) {
            let elapsed = last.elapsed();
            if elapsed < delay {
                tokio::time::sleep(delay - elapsed).await;
            }
        }

        self.last_request.insert(origin.to_string(), Instant::now());
    }
}
