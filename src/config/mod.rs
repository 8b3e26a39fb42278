//! Configuration module for Blog-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and compiling per-site selector tables.
//!
//! # Example
//!
//! ```no_run
//! use blog_scrape::config::{load_config, SiteRegistry};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sites.toml")).unwrap();
//! let registry = SiteRegistry::from_config(&config).unwrap();
//! println!("{} sites configured", registry.sites().len());
//! ```

mod parser;
mod selectors;
mod site;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FieldRule, LoggingConfig, OutputConfig, OutputFormat, OutputGrouping, ScraperConfig,
    SelectorSpec, SelectorTable, SiteEntry, SiteMatchPolicy, UserAgentConfig,
};

pub use selectors::{FieldSelector, SelectorCandidate, SelectorConfig};
pub use site::{parse_seed, SiteConfig, SiteRegistry};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
