//! Compiled site configurations and seed-to-site resolution

use crate::config::selectors::SelectorConfig;
use crate::config::types::{Config, SiteEntry, SiteMatchPolicy};
use crate::url::{extract_domain, matches_wildcard, parse_http_url};
use crate::ConfigError;
use url::Url;

/// A fully compiled site: domain pattern, seeds and selectors
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub domain: String,
    pub seeds: Vec<Url>,
    pub selectors: SelectorConfig,
}

impl SiteConfig {
    /// Compiles a raw site entry
    pub fn compile(entry: &SiteEntry) -> Result<Self, ConfigError> {
        let selectors = SelectorConfig::compile(&entry.selectors)?;

        let mut seeds = Vec::with_capacity(entry.seeds.len());
        for seed in &entry.seeds {
            seeds.push(parse_seed(seed)?);
        }

        Ok(Self {
            name: entry.name.clone(),
            domain: entry.domain.to_lowercase(),
            seeds,
            selectors,
        })
    }

    /// Returns true if this site's domain pattern covers the URL's host
    pub fn matches(&self, url: &Url) -> bool {
        extract_domain(url)
            .map(|domain| matches_wildcard(&self.domain, &domain))
            .unwrap_or(false)
    }
}

/// Parses a seed URL, accepting only absolute http(s) URLs
pub fn parse_seed(seed: &str) -> Result<Url, ConfigError> {
    parse_http_url(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))
}

/// All configured sites, in declaration order
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<SiteConfig>,
    policy: SiteMatchPolicy,
}

impl SiteRegistry {
    /// Builds the registry from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let sites = config
            .sites
            .iter()
            .map(SiteConfig::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sites,
            policy: config.scraper.site_match,
        })
    }

    pub fn sites(&self) -> &[SiteConfig] {
        &self.sites
    }

    /// Looks up a site by name
    pub fn get(&self, name: &str) -> Option<&SiteConfig> {
        self.sites.iter().find(|site| site.name == name)
    }

    /// Finds the site responsible for a seed URL
    ///
    /// When several domain patterns match, the configured policy decides:
    /// `First` keeps declaration order, `MostSpecific` prefers exact patterns
    /// over wildcards and then longer patterns.
    pub fn resolve(&self, seed: &Url) -> Option<&SiteConfig> {
        let mut matching = self.sites.iter().filter(|site| site.matches(seed));

        match self.policy {
            SiteMatchPolicy::First => matching.next(),
            SiteMatchPolicy::MostSpecific => {
                // max_by_key keeps the last maximum; reverse to keep the first
                let candidates: Vec<&SiteConfig> = matching.collect();
                candidates
                    .into_iter()
                    .rev()
                    .max_by_key(|site| specificity(&site.domain))
            }
        }
    }
}

fn specificity(pattern: &str) -> (bool, usize) {
    let exact = !pattern.starts_with("*.");
    let base_len = pattern.trim_start_matches("*.").len();
    (exact, base_len)
}
