//! Sumi-Rank: crawl a site and rank its pages
//!
//! This crate crawls a seed site, records the hyperlink graph among the pages
//! it fetched, and ranks those pages with PageRank (power iteration over the
//! damped transition matrix of the link graph).

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod rank;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Rank operations
#[derive(Debug, Error)]
pub enum RankError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Document already indexed: {url}")]
    DuplicateDocument { url: String },

    #[error("Cannot build a transition matrix from an empty link index")]
    EmptyGraph,

    #[error("Invalid PageRank parameter: {0}")]
    InvalidParameter(String),

    #[error("PageRank did not converge after {iterations} iterations (error {error:e})")]
    ConvergenceTimeout { iterations: usize, error: f64 },

    #[error("PageRank cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },

    #[error("Indexer task failed: {0}")]
    Indexer(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Rank operations
pub type Result<T> = std::result::Result<T, RankError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use index::{extract_links, Document, LinkIndex};
pub use pipeline::{rank_site, Interrupts};
pub use rank::{rank_pages, PageRankResult, PageRankSolver, RankedPage, TransitionMatrix};
pub use url::{canonicalize_url, extract_domain};
