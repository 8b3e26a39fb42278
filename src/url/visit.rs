use url::Url;

/// Query parameters that never change page identity
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Builds the key the cycle guard compares URLs by
///
/// Two URLs with the same key are treated as the same page:
///
/// 1. Host lowercased (the `url` crate already does this for special schemes)
/// 2. Fragment removed
/// 3. Path: empty and `.` segments dropped, `..` resolved, trailing slash
///    removed except for the root
/// 4. Tracking query parameters (`utm_*`, `fbclid`, `gclid`, `mc_eid`) removed
/// 5. Remaining query pairs sorted; an empty query is dropped
///
/// Scheme, port and `www.` are kept as they are.
///
/// # Examples
///
/// ```
/// use blog_scrape::url::visit_key;
/// use url::Url;
///
/// let a = Url::parse("https://example.com/mag/?page=2#top").unwrap();
/// let b = Url::parse("https://EXAMPLE.com/mag?page=2&utm_source=feed").unwrap();
/// assert_eq!(visit_key(&a), visit_key(&b));
/// ```
pub fn visit_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);

    let path = normalize_path(key.path());
    key.set_path(&path);

    if key.query().is_some() {
        let params = filter_and_sort_query_params(&key);
        if params.is_empty() {
            key.set_query(None);
        } else {
            key.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    key.to_string()
}

fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort();
    params
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
