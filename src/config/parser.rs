use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use blog_scrape::config::load_config;
///
/// let config = load_config(Path::new("sites.toml")).unwrap();
/// println!("Max pages per seed: {}", config.scraper.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Loads a configuration and returns both the config and its hash
///
/// The file is read once, so the hash always describes the parsed content.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{OutputFormat, OutputGrouping, SiteMatchPolicy};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const FULL_CONFIG: &str = r#"
[scraper]
max-pages = 3
delay-ms = 0
timeout-secs = 20
max-retries = 1
retry-delay-ms = 250
same-host-pagination = false
site-match = "most-specific"
max-posts = 40

[logging]
file = "./logs/scrape.log"

[user-agent]
crawler-name = "TestScraper"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[output]
format = "csv"
path = "./out"
grouping = "per-seed"
summary-path = "./summary.md"

[[site]]
name = "example-mag"
domain = "*.example.com"
seeds = ["https://example.com/mag", "https://blog.example.com/"]

[site.selectors]
container = "article.post"
title = ["h2.entry-title", "h2"]
date = ["time", { css = "meta[property='article:published_time']", attr = "content" }]
author = ".author"
content = ".entry-content"
next-page = { css = "link[rel='next']", attr = "href" }
preserve-html = true
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(FULL_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.max_pages, 3);
        assert_eq!(config.scraper.delay_ms, 0);
        assert_eq!(config.scraper.timeout_secs, 20);
        assert_eq!(config.scraper.max_retries, 1);
        assert!(!config.scraper.same_host_pagination);
        assert_eq!(config.scraper.site_match, SiteMatchPolicy::MostSpecific);
        assert_eq!(config.scraper.max_posts, Some(40));
        assert_eq!(config.logging.file.as_deref(), Some("./logs/scrape.log"));
        assert_eq!(config.user_agent.crawler_name, "TestScraper");
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.grouping, OutputGrouping::PerSeed);
        assert_eq!(config.sites.len(), 1);

        let selectors = &config.sites[0].selectors;
        assert_eq!(selectors.title.candidates().len(), 2);
        assert_eq!(selectors.date.as_ref().unwrap().candidates()[1].attr(), Some("content"));
        assert_eq!(
            selectors.next_page.as_ref().unwrap().candidates()[0].css(),
            "link[rel='next']"
        );
        assert!(selectors.preserve_html);
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse_config(
            r#"
[[site]]
name = "mag"
domain = "example.com"

[site.selectors]
title = "h1"
content = "article"
"#,
        )
        .unwrap();

        assert_eq!(config.scraper.max_pages, 5);
        assert_eq!(config.scraper.delay_ms, 1000);
        assert_eq!(config.scraper.timeout_secs, 10);
        assert_eq!(config.scraper.max_retries, 0);
        assert!(config.scraper.same_host_pagination);
        assert_eq!(config.scraper.site_match, SiteMatchPolicy::First);
        assert!(config.scraper.max_posts.is_none());
        assert!(config.logging.file.is_none());
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.grouping, OutputGrouping::Combined);
        assert!(config.output.path.is_none());
        assert!(config.sites[0].selectors.container.is_none());
        assert!(!config.sites[0].selectors.preserve_html);
    }

    #[test]
    fn test_missing_content_selector_fails() {
        let result = parse_config(
            r#"
[[site]]
name = "mag"
domain = "example.com"

[site.selectors]
title = "h1"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_selector_fails_at_load() {
        let result = parse_config(
            r#"
[[site]]
name = "mag"
domain = "example.com"

[site.selectors]
title = "h1"
content = "div[["
"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidSelector { .. })));
    }

    #[test]
    fn test_unknown_format_fails() {
        let result = parse_config(
            r#"
[output]
format = "xml"

[[site]]
name = "mag"
domain = "example.com"

[site.selectors]
title = "h1"
content = "article"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/sites.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_with_hash_matches_file_hash() {
        let file = create_temp_config(FULL_CONFIG);
        let (_, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }
}
