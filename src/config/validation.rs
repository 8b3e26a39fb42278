use crate::config::selectors::SelectorConfig;
use crate::config::site::parse_seed;
use crate::config::types::{
    Config, LoggingConfig, OutputConfig, ScraperConfig, SiteEntry, UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_logging_config(&config.logging)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.max_retries > 5 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 5, got {}",
            config.max_retries
        )));
    }

    if config.max_posts == Some(0) {
        return Err(ConfigError::Validation(
            "max_posts must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if let Some(header) = &config.header {
        if header.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent header cannot be empty".to_string(),
            ));
        }
        return Ok(());
    }

    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(&config.path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if matches!(&config.file, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "logging file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates site entries, compiling every selector
fn validate_sites(sites: &[SiteEntry]) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[site]] entry is required".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for entry in sites {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site name cannot be empty".to_string(),
            ));
        }

        if !names.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name '{}'",
                entry.name
            )));
        }

        validate_domain_pattern(&entry.domain)?;

        for seed in &entry.seeds {
            parse_seed(seed)?;
        }

        SelectorConfig::compile(&entry.selectors)?;
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    if let Some(domain) = pattern.strip_prefix("*.") {
        validate_domain_string(domain)
    } else {
        validate_domain_string(pattern)
    }
}

/// Validates a domain string (without wildcard prefix)
///
/// Single-label hosts such as `localhost` are accepted.
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
