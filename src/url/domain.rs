use url::Url;

/// Extracts the lowercase host of a URL, used as the crawl scope key
///
/// Ports are not part of the result, so `http://127.0.0.1:8080/` and
/// `http://127.0.0.1/` share a scope. A trailing root dot (`example.com.`)
/// is dropped.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_rank::url::extract_domain;
///
/// let url = Url::parse("https://Blog.Example.com:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .map(|h| h.trim_end_matches('.').to_lowercase())
        .filter(|h| !h.is_empty())
}
