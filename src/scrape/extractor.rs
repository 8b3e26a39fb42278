//! Selector-driven post extraction
//!
//! Given a fetched page and a site's compiled selectors, this module produces
//! the page's post records and the absolute URL of the next listing page.
//!
//! # Extraction Rules
//!
//! - Containers are the elements matching `container`, or the document root
//!   when no container selector is configured
//! - Each field tries its candidates in order; a candidate matches when its
//!   first element yields a non-empty value (first match wins)
//! - A container without content is dropped, never emitted empty
//! - `next-page` is applied once to the whole document

use crate::config::{FieldSelector, SelectorConfig};
use crate::scrape::types::{PageResult, PostRecord, RawPage};
use crate::url::resolve_link;
use crate::ParseError;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use url::Url;

/// Elements whose text never belongs to a post
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line in block text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "tr", "ul",
];

/// Default attribute holding the next page URL
const DEFAULT_LINK_ATTR: &str = "href";

/// How whitespace is normalized in extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextMode {
    /// Single line: every whitespace run becomes one space
    Inline,
    /// Multi line: lines trimmed, blank lines dropped
    Block,
}

/// Extracts post records and the next page link from a page
///
/// # Arguments
///
/// * `page` - The fetched page
/// * `selectors` - The site's compiled selectors
///
/// # Returns
///
/// * `Ok(PageResult)` - Records in document order plus the next page URL
/// * `Err(ParseError)` - The body contained no markup at all
///
/// # Example
///
/// ```
/// use blog_scrape::config::{parse_config, SiteConfig};
/// use blog_scrape::scrape::{extract, RawPage};
/// use url::Url;
///
/// let config = parse_config(r#"
/// [[site]]
/// name = "mag"
/// domain = "example.com"
///
/// [site.selectors]
/// container = "article"
/// title = "h2"
/// content = "p"
/// next-page = "a.next"
/// "#).unwrap();
/// let site = SiteConfig::compile(&config.sites[0]).unwrap();
///
/// let html = r#"<article><h2>Hello</h2><p>World</p></article><a class="next" href="/mag?page=2">Older</a>"#;
/// let page = RawPage::from_html(Url::parse("https://example.com/mag").unwrap(), html);
///
/// let result = extract(&page, &site.selectors).unwrap();
/// assert_eq!(result.records.len(), 1);
/// assert_eq!(result.records[0].title, "Hello");
/// assert_eq!(result.next_url.unwrap().as_str(), "https://example.com/mag?page=2");
/// ```
pub fn extract(page: &RawPage, selectors: &SelectorConfig) -> Result<PageResult, ParseError> {
    if page.body.trim().is_empty() {
        return Err(ParseError::EmptyDocument {
            url: page.final_url.to_string(),
        });
    }

    let document = Html::parse_document(&page.body);
    if !document.errors.is_empty() {
        tracing::trace!(
            "Recovered from {} markup errors on {}",
            document.errors.len(),
            page.final_url
        );
    }

    let source_url = page.final_url.as_str();
    let containers: Vec<ElementRef<'_>> = match &selectors.container {
        Some(container) => document.select(container).collect(),
        None => vec![document.root_element()],
    };

    let mut records = Vec::with_capacity(containers.len());
    for (index, container) in containers.into_iter().enumerate() {
        match extract_record(container, selectors, source_url) {
            Some(record) => records.push(record),
            None => tracing::debug!(
                "Dropping container {} on {}: no content matched [{}]",
                index,
                source_url,
                selectors.content.describe()
            ),
        }
    }

    let next_url = selectors
        .next_page
        .as_ref()
        .and_then(|field| find_next_url(&document, field, &page.final_url));

    Ok(PageResult { records, next_url })
}

/// Builds one record from a container, or `None` when it has no content
fn extract_record(
    container: ElementRef<'_>,
    selectors: &SelectorConfig,
    source_url: &str,
) -> Option<PostRecord> {
    let content = if selectors.preserve_html {
        first_html(container, &selectors.content)?
    } else {
        first_value(container, &selectors.content, TextMode::Block)?
    };

    let title = first_value(container, &selectors.title, TextMode::Inline).unwrap_or_default();
    let date = selectors
        .date
        .as_ref()
        .and_then(|field| first_value(container, field, TextMode::Inline));
    let author = selectors
        .author
        .as_ref()
        .and_then(|field| first_value(container, field, TextMode::Inline));

    Some(PostRecord {
        title,
        date,
        author,
        content,
        source_url: source_url.to_string(),
    })
}

/// Returns the first non-empty value any candidate yields
fn first_value(container: ElementRef<'_>, field: &FieldSelector, mode: TextMode) -> Option<String> {
    field.candidates().iter().find_map(|candidate| {
        let element = container.select(&candidate.selector).next()?;
        let value = match &candidate.attr {
            Some(attr) => normalize_text(element.value().attr(attr)?, mode),
            None => element_text(element, mode),
        };
        (!value.is_empty()).then_some(value)
    })
}

/// Returns the trimmed inner HTML of the first candidate with visible text
fn first_html(container: ElementRef<'_>, field: &FieldSelector) -> Option<String> {
    field.candidates().iter().find_map(|candidate| {
        let element = container.select(&candidate.selector).next()?;
        if element_text(element, TextMode::Inline).is_empty() {
            return None;
        }
        let html = element.inner_html().trim().to_string();
        (!html.is_empty()).then_some(html)
    })
}

/// Finds the first next-page element whose URL attribute resolves
fn find_next_url(document: &Html, field: &FieldSelector, base_url: &Url) -> Option<Url> {
    field.candidates().iter().find_map(|candidate| {
        let attr = candidate.attr.as_deref().unwrap_or(DEFAULT_LINK_ATTR);
        document
            .select(&candidate.selector)
            .filter_map(|element| element.value().attr(attr))
            .find_map(|href| resolve_link(href, base_url))
    })
}

/// Extracts an element's visible text
fn element_text(element: ElementRef<'_>, mode: TextMode) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    normalize_text(&raw, mode)
}

/// Appends text nodes below `element`, marking block boundaries with newlines
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn normalize_text(raw: &str, mode: TextMode) -> String {
    match mode {
        TextMode::Inline => raw.split_whitespace().collect::<Vec<_>>().join(" "),
        TextMode::Block => raw
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
