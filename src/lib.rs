//! Blog-Scrape: a selector-driven blog scraper
//!
//! This crate fetches blog listing pages, extracts post records with per-site
//! CSS selectors, follows pagination links and writes the collected records
//! as JSON or CSV.

pub mod config;
pub mod output;
pub mod scrape;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Blog-Scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid selector for '{field}' ({selector}): {message}")]
    InvalidSelector {
        field: String,
        selector: String,
        message: String,
    },

    #[error("No site configuration matches seed {seed}")]
    NoMatchingSite { seed: String },
}

/// Errors returned by the page fetcher
///
/// Each variant is a distinct failure kind; none of them is retried unless
/// `max-retries` is raised in the configuration.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Refusing to fetch {url}: only absolute http(s) URLs are supported")]
    InvalidUrl { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {code} for {url}")]
    HttpStatus { url: String, code: u16 },

    #[error("Unsupported content type '{content_type}' for {url}")]
    UnsupportedContentType { url: String, content_type: String },
}

impl FetchError {
    /// Returns true if another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { code, .. } => (500..600).contains(code),
            Self::InvalidUrl { .. } | Self::UnsupportedContentType { .. } => false,
        }
    }
}

/// Errors produced while turning a fetched page into a DOM
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Page {url} contains no markup")]
    EmptyDocument { url: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Blog-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use scrape::{extract, Driver, Fetcher, PostRecord, RawPage, ScrapeReport, ScrapeSession, Scraper};
pub use state::{DriverState, StopReason};
pub use url::{extract_domain, visit_key};
