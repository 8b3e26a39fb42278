use serde::Serialize;
use url::Url;

/// A fetched page, ready for extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// URL that was requested
    pub url: Url,

    /// URL after redirects; relative links resolve against this
    pub final_url: Url,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    /// Decoded response body
    pub body: String,
}

impl RawPage {
    /// Builds a page that was served directly (no redirect) as HTML
    pub fn from_html(url: Url, body: impl Into<String>) -> Self {
        Self {
            final_url: url.clone(),
            url,
            status: 200,
            content_type: Some("text/html".to_string()),
            body: body.into(),
        }
    }
}

/// One extracted blog post
///
/// Field order is the column order of the CSV output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub title: String,
    pub date: Option<String>,
    pub author: Option<String>,
    /// Never empty
    pub content: String,
    /// Listing page the record was extracted from
    pub source_url: String,
}

/// Records and next link found on a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub records: Vec<PostRecord>,
    pub next_url: Option<Url>,
}
