use url::Url;

/// Resolves an href against the page it appeared on
///
/// Returns `None` when the link cannot lead to another page:
/// - empty or fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - hrefs that fail to parse
/// - anything that is not http(s) after resolution
///
/// # Examples
///
/// ```
/// use blog_scrape::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/mag").unwrap();
/// let next = resolve_link("/mag?page=2", &base).unwrap();
/// assert_eq!(next.as_str(), "https://example.com/mag?page=2");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}
