//! Configuration module for Sumi-Rank
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_rank::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sumi-rank.toml")).unwrap();
//! println!("Damping factor: {}", config.pagerank.alpha);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, PageRankConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
