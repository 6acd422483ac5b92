use crate::UrlError;
use url::Url;

/// Query parameters that only track where a visitor came from
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Canonicalises a URL string so that every spelling of a page maps to one key
///
/// The link index, the crawl frontier and the extractor's self-link check all
/// compare URLs textually, so they must agree on a single form.
///
/// # Canonicalisation Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an `http` or `https` scheme and a host
/// 3. Remove the fragment (everything after #)
/// 4. Remove tracking query parameters (`utm_*`, `fbclid`, `gclid`, `mc_eid`)
/// 5. Sort remaining query parameters by key (stable, so repeated keys keep
///    their relative order)
/// 6. Remove an empty query string
///
/// Host lower-casing, default port removal and dot-segment removal are done
/// by the `url` parser itself.
///
/// # Examples
///
/// ```
/// use sumi_rank::url::canonicalize_url;
///
/// let url = canonicalize_url("HTTP://Example.COM:80/a/../b?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/b");
/// ```
pub fn canonicalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}

/// Canonicalises an already parsed URL (see [`canonicalize_url`])
pub fn canonicalize(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }

    Ok(url)
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
