use serde::Deserialize;

/// Main configuration structure for Blog-Scrape
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(rename = "site", default)]
    pub sites: Vec<SiteEntry>,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum number of pages fetched per seed
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum number of records kept per seed; unlimited when absent
    #[serde(rename = "max-posts", default)]
    pub max_posts: Option<u32>,

    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts for transient fetch failures
    #[serde(rename = "max-retries", default)]
    pub max_retries: u32,

    /// Pause between fetch attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Stop paginating when the next link leaves the seed's host
    #[serde(rename = "same-host-pagination", default = "default_true")]
    pub same_host_pagination: bool,

    /// How to pick a site when several domain patterns match one seed
    #[serde(rename = "site-match", default)]
    pub site_match: SiteMatchPolicy,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_posts: None,
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
            same_host_pagination: true,
            site_match: SiteMatchPolicy::default(),
        }
    }
}

/// Resolution policy for seeds matched by more than one site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteMatchPolicy {
    /// First matching site in declaration order
    #[default]
    First,
    /// Exact domain beats wildcard, longer pattern beats shorter
    MostSpecific,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Full header value, used verbatim when set
    #[serde(default)]
    pub header: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            header: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Name/Version (+ContactURL)`, or the `header` override.
    pub fn header_value(&self) -> String {
        if let Some(header) = &self.header {
            return header.clone();
        }
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Serialization format for records
    #[serde(default)]
    pub format: OutputFormat,

    /// Output file (combined) or directory (per-seed); stdout when absent
    #[serde(default)]
    pub path: Option<String>,

    /// Whether records are written together or one file per seed
    #[serde(default)]
    pub grouping: OutputGrouping,

    /// Optional markdown summary file
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log file written alongside stderr output
    #[serde(default)]
    pub file: Option<String>,
}

/// Record serialization format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// Record grouping in the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputGrouping {
    #[default]
    Combined,
    PerSeed,
}

/// One target site: where it lives, where to start and how to read it
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Unique site identifier
    pub name: String,

    /// Domain pattern (e.g., "example.com" or "*.example.com")
    pub domain: String,

    /// Seed URLs belonging to this site
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Selector table for this site
    pub selectors: SelectorTable,
}

/// Raw selector table as written in the config file
///
/// Compiled into a [`crate::config::SelectorConfig`] during validation.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorTable {
    /// Element scoping one post; the whole document when absent
    #[serde(default)]
    pub container: Option<String>,

    pub title: FieldRule,

    #[serde(default)]
    pub date: Option<FieldRule>,

    #[serde(default)]
    pub author: Option<FieldRule>,

    pub content: FieldRule,

    #[serde(rename = "next-page", default)]
    pub next_page: Option<FieldRule>,

    /// Keep the content element's inner HTML instead of its text
    #[serde(rename = "preserve-html", default)]
    pub preserve_html: bool,
}

/// A field selector: one candidate or an ordered fallback list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldRule {
    One(SelectorSpec),
    Many(Vec<SelectorSpec>),
}

impl FieldRule {
    /// Returns the candidates in fallback order
    pub fn candidates(&self) -> &[SelectorSpec] {
        match self {
            Self::One(spec) => std::slice::from_ref(spec),
            Self::Many(specs) => specs,
        }
    }
}

/// A single selector candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    /// Plain CSS selector, value taken from the element text
    Css(String),
    /// CSS selector plus the attribute holding the value
    Attr { css: String, attr: String },
}

impl SelectorSpec {
    pub fn css(&self) -> &str {
        match self {
            Self::Css(css) => css,
            Self::Attr { css, .. } => css,
        }
    }

    pub fn attr(&self) -> Option<&str> {
        match self {
            Self::Css(_) => None,
            Self::Attr { attr, .. } => Some(attr),
        }
    }
}

fn default_max_pages() -> u32 {
    5
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_crawler_name() -> String {
    "blog-scrape".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
