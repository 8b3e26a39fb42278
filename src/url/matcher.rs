/// Checks if a host matches a site's domain pattern
///
/// Two pattern forms are supported:
/// 1. Exact: "example.com" matches only "example.com"
/// 2. Wildcard: "*.example.com" matches "example.com" and any subdomain
///
/// Both sides are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use blog_scrape::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.com", "example.com"));
/// assert!(!matches_wildcard("example.com", "blog.example.com"));
///
/// assert!(matches_wildcard("*.example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "blog.example.com"));
/// assert!(!matches_wildcard("*.example.com", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}
