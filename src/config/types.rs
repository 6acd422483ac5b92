use crate::rank::{DEFAULT_ALPHA, DEFAULT_EPSILON, DEFAULT_MAX_ITERATIONS};
use serde::Deserialize;

/// Main configuration structure for Sumi-Rank
///
/// Every section is optional; a missing section or key takes its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub pagerank: PageRankConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to fetch
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum link distance from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,

    /// Minimum time between the starts of two requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Capacity of the channel between fetchers and the indexer
    #[serde(rename = "channel-capacity")]
    pub channel_capacity: usize,

    /// Follow links into subdomains of the seed host
    #[serde(rename = "include-subdomains")]
    pub include_subdomains: bool,

    /// Honour robots.txt rules and crawl delays
    #[serde(rename = "respect-robots-txt")]
    pub respect_robots_txt: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 500,
            max_depth: 16,
            max_concurrent_requests: 4,
            request_delay_ms: 0,
            request_timeout_secs: 30,
            channel_capacity: 64,
            include_subdomains: false,
            respect_robots_txt: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiRank".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// PageRank parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// Damping factor, strictly between 0 and 1
    pub alpha: f64,

    /// Convergence threshold on the L1 distance between iterations
    pub epsilon: f64,

    /// Iteration bound; exceeding it is reported as a convergence failure
    #[serde(rename = "max-iterations")]
    pub max_iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}
