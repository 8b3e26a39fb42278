//! Scrape module for page fetching and record extraction
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with content-type checks
//! - Selector-driven record extraction
//! - The per-seed pagination state machine
//! - Overall run coordination

mod coordinator;
mod driver;
mod extractor;
mod fetcher;
mod session;
mod types;

pub use coordinator::{Scraper, Seed};
pub use driver::{Driver, DriverOptions};
pub use extractor::extract;
pub use fetcher::{build_http_client, Fetcher};
pub use session::{ScrapeReport, ScrapeSession, SessionError};
pub use types::{PageResult, PostRecord, RawPage};
