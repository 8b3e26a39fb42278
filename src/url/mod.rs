//! URL handling module for Blog-Scrape
//!
//! This module provides domain extraction, wildcard site matching, link
//! resolution and the visit keys used by the pagination cycle guard.

mod matcher;
mod resolve;
mod visit;

pub use matcher::matches_wildcard;
pub use resolve::resolve_link;
pub use visit::visit_key;

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses an absolute http(s) URL with a host
pub fn parse_http_url(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use blog_scrape::url::extract_domain;
///
/// let url = Url::parse("https://Blog.Example.com:8443/posts").unwrap();
/// assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true when both URLs point at the same host
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
