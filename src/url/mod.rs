//! URL handling module for Sumi-Rank
//!
//! This module provides URL canonicalisation, domain extraction, and the
//! site-scope check the crawler uses to stay on the seed's site.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{canonicalize, canonicalize_url};

use url::Url;

/// Returns true if `candidate` belongs to the site rooted at `seed_host`
///
/// A URL is in scope when its host equals the seed host. With
/// `include_subdomains`, any host ending in `.{seed_host}` is accepted too.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_rank::url::in_scope;
///
/// let url = Url::parse("https://blog.example.com/post").unwrap();
/// assert!(!in_scope("example.com", &url, false));
/// assert!(in_scope("example.com", &url, true));
/// ```
pub fn in_scope(seed_host: &str, candidate: &Url, include_subdomains: bool) -> bool {
    let Some(host) = extract_domain(candidate) else {
        return false;
    };

    if host == seed_host {
        return true;
    }

    include_subdomains
        && host
            .strip_suffix(seed_host)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
