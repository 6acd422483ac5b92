//! Robots.txt handling module
//!
//! This module fetches and parses robots.txt files so the crawler can skip
//! disallowed pages and slow down for hosts that ask for a crawl delay.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;
use url::Url;

/// Fetches robots.txt for the origin of `url`
///
/// # Fetch Outcomes
///
/// | Response | Policy |
/// |----------|--------|
/// | 2xx | Parse the body |
/// | 4xx | No robots.txt: allow all |
/// | 5xx / network error | Allow all, with a warning |
///
/// Never fails: an unreachable robots.txt must not stop the crawl.
pub async fn fetch_robots(client: &Client, url: &Url) -> ParsedRobots {
    let robots_url = match url.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL for {}: {}", url, e);
            return ParsedRobots::allow_all();
        }
    };

    tracing::debug!("Fetching {}", robots_url);

    let response = match client.get(robots_url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    let status = response.status();
    if status.is_client_error() {
        tracing::debug!("No robots.txt at {} (HTTP {})", robots_url, status.as_u16());
        return ParsedRobots::allow_all();
    }

    if !status.is_success() {
        tracing::warn!(
            "Unexpected HTTP {} for {}, allowing all",
            status.as_u16(),
            robots_url
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
