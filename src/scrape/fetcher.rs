//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for listing pages
//! - Error classification into network, status and content-type failures
//! - Optional retries for transient failures (off by default)

use crate::config::{ScraperConfig, UserAgentConfig};
use crate::scrape::types::RawPage;
use crate::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Content types the extractor can work with
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use blog_scrape::config::UserAgentConfig;
/// use blog_scrape::scrape::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages over HTTP
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the scraper and user agent configuration
    pub fn new(
        scraper: &ScraperConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, Duration::from_secs(scraper.timeout_secs))?;
        Ok(Self::with_client(
            client,
            scraper.max_retries,
            Duration::from_millis(scraper.retry_delay_ms),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            max_retries,
            retry_delay,
        }
    }

    /// Fetches a page
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Non-http(s) URL | `InvalidUrl` (no request made) |
    /// | Connect error, timeout, body read failure | `Network` |
    /// | Non-2xx status | `HttpStatus` |
    /// | Content-Type other than HTML | `UnsupportedContentType` |
    ///
    /// `Network` errors and 5xx statuses are retried up to `max_retries`
    /// times; with the default of 0 each page gets exactly one attempt.
    pub async fn fetch(&self, url: &Url) -> Result<RawPage, FetchError> {
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Fetch of {} failed ({}), retry {}/{}",
                        url,
                        e,
                        attempt,
                        self.max_retries
                    );
                    if !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<RawPage, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| network_error(url, &e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if let Some(content_type) = &content_type {
            if !is_html_content_type(content_type) {
                return Err(FetchError::UnsupportedContentType {
                    url: url.to_string(),
                    content_type: content_type.clone(),
                });
            }
        }

        let body = response.text().await.map_err(|e| network_error(url, &e))?;

        if final_url != *url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        Ok(RawPage {
            url: url.clone(),
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

fn network_error(url: &Url, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}

/// Returns true if a Content-Type header value denotes HTML
fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    HTML_CONTENT_TYPES.contains(&mime.as_str())
}
