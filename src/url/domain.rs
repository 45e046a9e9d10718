use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (`mailto:`, `data:` and friends), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seo_crawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true when `candidate` shares scheme, host and port with `base`
///
/// No `www.` or subdomain folding is applied: `blog.example.com` is a different
/// site from `example.com`.
pub fn is_same_origin(base: &Url, candidate: &Url) -> bool {
    match (extract_domain(base), extract_domain(candidate)) {
        (Some(base_host), Some(candidate_host)) => {
            base.scheme() == candidate.scheme()
                && base_host == candidate_host
                && base.port_or_known_default() == candidate.port_or_known_default()
        }
        _ => false,
    }
}

/// Key under which per-origin state (robots policy, pacing) is stored
pub fn origin_key(url: &Url) -> String {
    url.origin().ascii_serialization()
}
