//! Scrape coordinator - runs every seed through the pagination driver
//!
//! The coordinator owns the compiled site registry and a single driver. It
//! resolves each seed to a site, runs the seeds strictly one after another,
//! and collects one session per seed into a report. A seed that fails never
//! stops the others.

use crate::config::{Config, SiteConfig, SiteRegistry};
use crate::scrape::driver::{Driver, DriverOptions};
use crate::scrape::fetcher::Fetcher;
use crate::scrape::session::{ScrapeReport, ScrapeSession};
use crate::{ConfigError, ScrapeError};
use chrono::Utc;
use std::time::Duration;
use url::Url;

/// A starting URL, optionally tied to the site it was declared under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub url: Url,
    /// Declaring site name; `None` means resolve by domain
    pub site: Option<String>,
}

impl Seed {
    /// A seed whose site is found by matching domain patterns
    pub fn new(url: Url) -> Self {
        Self { url, site: None }
    }

    /// A seed declared under a named site
    pub fn for_site(url: Url, site: impl Into<String>) -> Self {
        Self {
            url,
            site: Some(site.into()),
        }
    }
}

/// Main scraper structure
pub struct Scraper {
    registry: SiteRegistry,
    driver: Driver,
    max_pages: u32,
}

impl Scraper {
    /// Creates a scraper from a validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Sites compiled and HTTP client built
    /// * `Err(ScrapeError)` - A site failed to compile or the client could not be built
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let registry = SiteRegistry::from_config(config)?;
        let fetcher = Fetcher::new(&config.scraper, &config.user_agent)?;
        let options = DriverOptions {
            delay: Duration::from_millis(config.scraper.delay_ms),
            same_host_pagination: config.scraper.same_host_pagination,
            max_posts: config.scraper.max_posts,
        };

        tracing::debug!(
            "Scraper ready: {} sites, max {} pages per seed",
            registry.sites().len(),
            config.scraper.max_pages
        );

        Ok(Self {
            registry,
            driver: Driver::new(fetcher, options),
            max_pages: config.scraper.max_pages,
        })
    }

    /// Overrides the per-seed page limit
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    /// Every seed declared in the configuration, in declaration order
    pub fn config_seeds(&self) -> Vec<Seed> {
        self.registry
            .sites()
            .iter()
            .flat_map(|site| {
                site.seeds
                    .iter()
                    .map(|url| Seed::for_site(url.clone(), site.name.clone()))
            })
            .collect()
    }

    /// Finds the site a seed will be scraped with
    pub fn site_for(&self, seed: &Seed) -> Result<&SiteConfig, ConfigError> {
        let site = match &seed.site {
            Some(name) => self.registry.get(name),
            None => self.registry.resolve(&seed.url),
        };

        site.ok_or_else(|| ConfigError::NoMatchingSite {
            seed: seed.url.to_string(),
        })
    }

    /// Scrapes all seeds in order and returns the report
    pub async fn run(&self, seeds: &[Seed]) -> ScrapeReport {
        let started_at = Utc::now();
        let mut sessions = Vec::with_capacity(seeds.len());

        tracing::info!("Starting scrape of {} seeds", seeds.len());

        for seed in seeds {
            let session = match self.site_for(seed) {
                Ok(site) => self.driver.run(&seed.url, site, self.max_pages).await,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", seed.url, e);
                    ScrapeSession::failed(seed.url.clone(), e)
                }
            };
            sessions.push(session);
        }

        let report = ScrapeReport {
            sessions,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Scrape complete: {} records from {} pages, {} seeds with errors",
            report.total_records(),
            report.total_pages(),
            report.failed_seeds()
        );

        report
    }
}
