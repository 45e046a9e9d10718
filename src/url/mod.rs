//! URL handling module
//!
//! Base URL validation, same-origin comparison and robots.txt location.

mod domain;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_same_origin, origin_key};

/// Parses and validates the URL a crawl starts from
///
/// The base URL must be absolute, use HTTP or HTTPS, and carry a host. Any other
/// input is a startup error: the crawl aborts before the first request.
///
/// # Examples
///
/// ```
/// use seo_crawler::url::parse_base_url;
///
/// assert!(parse_base_url("https://example.com/").is_ok());
/// assert!(parse_base_url("ftp://example.com/").is_err());
/// assert!(parse_base_url("not a url").is_err());
/// ```
pub fn parse_base_url(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if extract_domain(&url).map_or(true, |host| host.is_empty()) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Location of the robots.txt governing `url`
pub fn robots_url(url: &Url) -> Result<Url, UrlError> {
    url.join("/robots.txt")
        .map_err(|e| UrlError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_accepts_http_and_https() {
        assert!(parse_base_url("http://example.com").is_ok());
        assert!(parse_base_url("  https://example.com/start  ").is_ok());
    }

    #[test]
    fn test_parse_base_url_rejects_bad_input() {
        assert!(matches!(parse_base_url(""), Err(UrlError::Parse(_))));
        assert!(matches!(
            parse_base_url("example.com/no-scheme"),
            Err(UrlError::Parse(_))
        ));
        assert!(matches!(
            parse_base_url("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            parse_base_url("mailto:someone@example.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_robots_url() {
        let url = Url::parse("https://example.com/blog/post?x=1#frag").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "https://example.com/robots.txt"
        );

        let url = Url::parse("http://127.0.0.1:8080/a").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "http://127.0.0.1:8080/robots.txt"
        );
    }
}
